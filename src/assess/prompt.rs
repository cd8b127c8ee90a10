//! Prompt templates for the chat assessment engine

/// System message sent with every completion
pub const SYSTEM_PROMPT: &str = "You are software engineer with 10 years of experience";

/// Prompt asking for a short assessment of one file
pub fn file_prompt(content: &str, requirements: &str) -> String {
    format!(
        "Analyze the following code based on the task requirements:\n\
         ### Task Requirements:\n\
         {requirements}\n\n\
         ### Code File:\n\
         {content}\n\n\
         Provide a short response (up to 100 words) covering:\n\
         1. Compliance with the task requirements.\n\
         2. Key issues or bugs.\n\
         3. Suggestions for improvement.\n\n\
         Be concise and precise."
    )
}

/// Prompt asking for the repository summary as a JSON object
pub fn repository_prompt(reviews: &str) -> String {
    format!(
        "You are an expert code reviewer. Based on the following file reviews, \
         provide a general review for the entire repository. Respond with a valid \
         JSON object in exactly this format:\n\n\
         {{\"message\": \"your review message\", \"grade\": <integer between 0 and 5>}}\n\n\
         - \"message\" is a concise summary of the strengths and weaknesses of the \
         repository, based on the individual file reviews.\n\
         - \"grade\" is an integer from 0 to 5:\n  \
           0: Completely inadequate.\n  \
           1: Poor, with major issues.\n  \
           2: Fair, but needs a lot of improvement.\n  \
           3: Decent, with room for improvement.\n  \
           4: Good, but with minor improvements needed.\n  \
           5: Excellent, no improvements needed.\n\
         - Return nothing but the JSON object.\n\n\
         File reviews (separated by --):\n\n\
         {reviews}"
    )
}
