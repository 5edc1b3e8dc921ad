use crate::models::domain::Domain;

/// Assembles the candidate prompt from the request and every non-blank answer.
///
/// `"{domain label}: {user_input}, {answer 1}, {answer 2}, ..."`
pub fn synthesize_draft(domain: Domain, user_input: &str, answers: &[String]) -> String {
    let parts: Vec<&str> = std::iter::once(user_input)
        .chain(answers.iter().map(String::as_str))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    format!("{}: {}", domain.label(), parts.join(", "))
}
