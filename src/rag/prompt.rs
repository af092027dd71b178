// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Reply prompt assembly.
//!
//! One fixed instruction template: the rule list, the retrieved snippets as
//! a bullet list, and the original email body untruncated. The generator
//! signals irrelevance by answering exactly "No suggestion." — the API layer
//! turns that into the canned response.

/// Builds the generation prompt from retrieved context and the email body.
pub fn build_reply_prompt(snippets: &[String], email_body: &str) -> String {
    let mut context_block = String::new();
    if snippets.is_empty() {
        context_block.push_str("(no relevant context found)");
    } else {
        for snippet in snippets {
            context_block.push_str("- ");
            context_block.push_str(snippet);
            context_block.push('\n');
        }
    }

    format!(
        "**Task:** Write a professional reply to the email.\n\
         \n\
         **Rules:**\n\
         1. Read the **Context** to find specific information (like links, names, skills).\n\
         2. Read the **Email** to understand exactly what the sender wants.\n\
         3. Your reply **must use the information from the Context** to answer the Email.\n\
         4. If the Email is asking for a meeting, and the Context has a link, **you must include the link.**\n\
         5. If the Email is not relevant to the Context (e.g., it's a newsletter or spam), just write the words: \"No suggestion.\"\n\
         6. The reply should be polite, professional, and ready to send.\n\
         \n\
         **Context:**\n\
         {}\n\
         \n\
         **Email:**\n\
         {}\n\
         \n\
         **Reply:**",
        context_block.trim_end(),
        email_body
    )
}
