pub const NO_ANSWER_REPLY: &str =
    "I'm sorry, I don't know the answer based on the provided information.";
pub const ERROR_REPLY: &str = "Sorry, something went wrong. Please try again.";

const LEAK_MARKERS: [&str; 4] = ["context provided", "system:", "question:", "answer:"];
const LEAK_PREFIXES: [&str; 3] = ["You are", "The context", "System:"];

/// Trims the model output and swaps empty or prompt-echoing answers for
/// `NO_ANSWER_REPLY`.
pub fn screen_answer(answer: &str) -> String {
    let answer = answer.trim();
    let lowered = answer.to_lowercase();

    let leaks = LEAK_MARKERS.iter().any(|m| lowered.contains(m))
        || LEAK_PREFIXES.iter().any(|p| answer.starts_with(p));

    if answer.is_empty() || leaks {
        NO_ANSWER_REPLY.to_string()
    } else {
        answer.to_string()
    }
}
