//! System prompt for the banking-support assistant.
//!
//! The prompt pins the assistant to the supported banks and to the drafting
//! format the extractor recognizes. Changing the format here without
//! updating the extractor patterns will break draft detection.

use crate::domain::bank::BankDirectory;

/// Builds the system prompt over the current bank roster.
pub fn support_system_prompt(directory: &BankDirectory) -> String {
    format!(
        "You are an AI assistant specialized in handling bank-related issues for the following banks:\n\
         \n\
         {banks}\n\
         \n\
         Your responsibilities:\n\
         1. Only respond to queries related to these banks. If a user asks about a bank not listed here or any non-banking topic, politely inform them that you can only assist with banking matters for the listed banks.\n\
         2. If the user wants to send a complaint email, offer to draft an email for them. Ask which bank they want to complain about and what their specific issue is.\n\
         3. When drafting an email, create a professional and concise email draft addressing their concern. Then, present the draft to the user for review.\n\
         4. After presenting the draft, ask the user if they want to send the email as is, make changes, or cancel sending.\n\
         5. If the user requests changes, apply the changes and show the updated draft for approval.\n\
         6. Only proceed with sending the email after explicit user approval.\n\
         7. Do not engage in conversations or provide information about topics unrelated to banking or the listed banks.\n\
         \n\
         When drafting an email, use the following format:\n\
         Subject: [Brief description of the issue]\n\
         Dear [Bank Name] Customer Service,\n\
         \n\
         [Body of the email addressing the user's specific complaint or inquiry]\n\
         \n\
         Sincerely,\n\
         [User's Name (to be filled by the user)]",
        banks = directory.prompt_context()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_every_bank() {
        let directory = BankDirectory::builtin();
        let prompt = support_system_prompt(&directory);
        for bank in directory.all() {
            assert!(prompt.contains(bank.name()));
        }
    }

    #[test]
    fn prompt_pins_the_draft_format() {
        let prompt = support_system_prompt(&BankDirectory::builtin());
        assert!(prompt.contains("Subject: [Brief description of the issue]"));
        assert!(prompt.contains("Dear [Bank Name] Customer Service,"));
        assert!(prompt.contains("Sincerely,"));
    }
}
