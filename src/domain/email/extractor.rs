//! Draft extraction from assistant replies.
//!
//! Pure heuristic over free text, not a grammar: a reply is a draft when it
//! carries both a `Subject:` line and a `Dear <Bank> Customer Service,`
//! salutation. Anything else is relayed to the user untouched. When the same
//! marker appears more than once, the first occurrence wins.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::bank::BankDirectory;

use super::draft::EmailDraft;

/// First line of the form `Subject: <text>`.
static SUBJECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Subject:[ \t]*(.+)$").expect("subject pattern is valid"));

/// First bank-name-bearing greeting.
static SALUTATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Dear (.+?) Customer Service,").expect("salutation pattern is valid"));

/// Trailing sign-off block, excluded from the extracted body.
static SIGNOFF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*Sincerely,").expect("signoff pattern is valid"));

/// Outcome of inspecting an assistant reply.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftExtraction {
    /// The reply is a draft addressed to a supported bank.
    Draft(EmailDraft),
    /// The reply is draft-shaped but names a bank not in the directory.
    /// The controller must ask for clarification, not drop it silently.
    UnknownBank { name: String },
    /// The reply is ordinary conversation.
    NotADraft,
}

/// Inspects an assistant reply for an email draft.
///
/// Requires both markers; extracts the subject from the subject line, the
/// bank name from the salutation, and the body between the salutation line
/// and the `Sincerely,` sign-off (or end of text).
pub fn extract_draft(reply: &str, directory: &BankDirectory) -> DraftExtraction {
    let Some(subject_caps) = SUBJECT_RE.captures(reply) else {
        return DraftExtraction::NotADraft;
    };
    let Some(salutation_caps) = SALUTATION_RE.captures(reply) else {
        return DraftExtraction::NotADraft;
    };

    let subject = subject_caps[1].trim().to_string();
    let bank_name = salutation_caps[1].trim().to_string();

    let Some(bank) = directory.find_by_name(&bank_name) else {
        return DraftExtraction::UnknownBank { name: bank_name };
    };

    let salutation_end = salutation_caps.get(0).map(|m| m.end()).unwrap_or(0);
    let body = body_between(reply, salutation_end);

    DraftExtraction::Draft(EmailDraft::new(subject, body, bank.clone()))
}

/// Extracts the body: everything after the salutation line, up to (but
/// excluding) the sign-off block.
fn body_between(reply: &str, salutation_end: usize) -> String {
    let after_salutation = &reply[salutation_end..];
    let body_start = after_salutation
        .find('\n')
        .map(|n| n + 1)
        .unwrap_or(after_salutation.len());
    let body_region = &after_salutation[body_start..];

    let body_end = SIGNOFF_RE
        .find(body_region)
        .map(|m| m.start())
        .unwrap_or(body_region.len());

    body_region[..body_end].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> BankDirectory {
        BankDirectory::builtin()
    }

    const FULL_DRAFT: &str = "Subject: Unauthorized charge on my account\n\
        Dear GlobalBank Customer Service,\n\
        \n\
        I noticed an unauthorized charge of $50 on my checking account on June 3rd.\n\
        Please investigate and reverse it.\n\
        \n\
        Sincerely,\n\
        [User's Name (to be filled by the user)]";

    mod recognized_drafts {
        use super::*;

        #[test]
        fn extracts_subject_bank_and_body() {
            let extraction = extract_draft(FULL_DRAFT, &directory());
            let DraftExtraction::Draft(draft) = extraction else {
                panic!("expected a draft, got {:?}", extraction);
            };

            assert_eq!(draft.subject(), "Unauthorized charge on my account");
            assert_eq!(draft.bank().name(), "GlobalBank");
            assert!(draft
                .body_text()
                .starts_with("I noticed an unauthorized charge"));
            assert!(!draft.body_text().contains("Sincerely,"));
        }

        #[test]
        fn body_starts_after_salutation_line() {
            let reply = "Subject: Card lost\nDear GlobalBank Customer Service,\nBody text...";
            let DraftExtraction::Draft(draft) = extract_draft(reply, &directory()) else {
                panic!("expected a draft");
            };
            assert!(draft.body_text().starts_with("Body text..."));
        }

        #[test]
        fn bank_name_match_ignores_case() {
            let reply = "Subject: Fees\nDear cityfinance Customer Service,\nWaive them.";
            let DraftExtraction::Draft(draft) = extract_draft(reply, &directory()) else {
                panic!("expected a draft");
            };
            assert_eq!(draft.bank().name(), "CityFinance");
        }

        #[test]
        fn surrounding_prose_does_not_block_extraction() {
            let reply = format!(
                "Here is a draft addressing your concern:\n\n{}\n\nLet me know if you'd like changes.",
                FULL_DRAFT
            );
            assert!(matches!(
                extract_draft(&reply, &directory()),
                DraftExtraction::Draft(_)
            ));
        }

        #[test]
        fn first_subject_occurrence_wins() {
            let reply = "Subject: First subject\n\
                Dear GlobalBank Customer Service,\n\
                Subject: Second subject mentioned in the body\n\
                rest of body";
            let DraftExtraction::Draft(draft) = extract_draft(reply, &directory()) else {
                panic!("expected a draft");
            };
            assert_eq!(draft.subject(), "First subject");
        }

        #[test]
        fn first_salutation_occurrence_wins() {
            let reply = "Subject: Complaint\n\
                Dear GlobalBank Customer Service,\n\
                Earlier I wrote 'Dear UnionBank Customer Service,' by mistake.\n";
            let DraftExtraction::Draft(draft) = extract_draft(reply, &directory()) else {
                panic!("expected a draft");
            };
            assert_eq!(draft.bank().name(), "GlobalBank");
        }
    }

    mod rejected_replies {
        use super::*;

        #[test]
        fn missing_salutation_is_not_a_draft() {
            let reply = "Subject: Card lost\nHere is some advice about your card.";
            assert_eq!(extract_draft(reply, &directory()), DraftExtraction::NotADraft);
        }

        #[test]
        fn missing_subject_is_not_a_draft() {
            let reply = "Dear GlobalBank Customer Service,\nPlease help me.";
            assert_eq!(extract_draft(reply, &directory()), DraftExtraction::NotADraft);
        }

        #[test]
        fn ordinary_conversation_is_not_a_draft() {
            let reply = "You should call your bank's fraud line as soon as possible.";
            assert_eq!(extract_draft(reply, &directory()), DraftExtraction::NotADraft);
        }
    }

    mod unknown_banks {
        use super::*;

        #[test]
        fn draft_shaped_reply_with_unlisted_bank_is_flagged() {
            let reply = "Subject: Complaint\nDear Unknown Corp Customer Service,\nPlease fix this.";
            assert_eq!(
                extract_draft(reply, &directory()),
                DraftExtraction::UnknownBank {
                    name: "Unknown Corp".to_string()
                }
            );
        }
    }
}
