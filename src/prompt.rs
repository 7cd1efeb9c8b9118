// Prompt construction for the "What is ..." explainer pages.

/// Build the generation prompt for one topic.
///
/// The topic is embedded verbatim. Nothing is escaped: the string only ever
/// travels inside a prompt, never into a rendered page.
pub fn build_prompt(topic: &str) -> String {
    format!(
        "Write a complete, self-contained HTML document that explains \"What is {topic}?\" \
         to a curious beginner.\n\
         \n\
         Requirements:\n\
         - Style the page with Tailwind CSS loaded from its CDN \
         (<script src=\"https://cdn.tailwindcss.com\"></script>).\n\
         - Use a clear title, short sections with headings, and at least one example.\n\
         - Start the output with the exact line <!DOCTYPE html> and end it with </html>.\n\
         - Do not wrap the document in markdown code fences.\n\
         - Do not write any explanation, notes, or text before or after the HTML."
    )
}
