//! Keyword skill scan over extracted CV text.

/// The recognised skills, already lower-cased. Match results follow this order.
pub const SKILL_LIST: [&str; 15] = [
    "python",
    "django",
    "flask",
    "sql",
    "postgres",
    "javascript",
    "react",
    "node",
    "aws",
    "docker",
    "kubernetes",
    "java",
    "c++",
    "html",
    "css",
];

/// Returns every skill that occurs anywhere in `text`, case-insensitively.
///
/// Plain substring containment, not word matching: `postgresql` yields both
/// `sql` and `postgres`, `javascript` yields both `javascript` and `java`.
pub fn match_skills(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    SKILL_LIST
        .iter()
        .filter(|skill| text_lower.contains(*skill))
        .map(|skill| skill.to_string())
        .collect()
}
