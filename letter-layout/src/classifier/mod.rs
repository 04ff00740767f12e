//! Assigns each block a letter-schema role.
//!
//! Roles come from an ordered rule table: for each block the rules are tried in
//! priority order and the first match wins. Rules see the block and a running
//! context (position, whether a date or recipient was already found), which is
//! how the positional rules (sender, recipient) sit in the same table as the
//! lexical ones.

mod patterns;

pub use patterns::{
    is_closing, is_date, is_salutation, is_subject, split_right_float, wrap_right_float,
    FloatSplit, RIGHT_FLOAT_CLOSE, RIGHT_FLOAT_OPEN,
};

use crate::blocks::{Block, Document};

/// Role of a block in the letter schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Sender,
    Recipient,
    Date,
    Salutation,
    Subject,
    Body,
    Closing,
    Unknown,
}

/// A block paired with the role the classifier gave it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedBlock {
    pub block: Block,
    pub role: Role,
}

/// State carried across blocks while classifying a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleContext {
    pub position: usize,
    pub date_taken: bool,
    pub recipient_taken: bool,
    pub salutation_seen: bool,
}

impl RuleContext {
    fn record(&mut self, role: Role, block: &Block) {
        match role {
            Role::Date => {
                self.date_taken = true;
                // An already merged recipient+date paragraph carries the recipient too
                if split_right_float(&block.inner_content).has_outside() {
                    self.recipient_taken = true;
                }
            }
            Role::Recipient => self.recipient_taken = true,
            Role::Salutation => self.salutation_seen = true,
            _ => {}
        }
    }
}

/// Block text prepared once for all rules
pub struct Candidate<'a> {
    pub block: &'a Block,
    pub text: String,
}

impl<'a> Candidate<'a> {
    pub fn new(block: &'a Block) -> Self {
        Self {
            block,
            text: block.plain_text(),
        }
    }
}

pub struct Rule {
    pub name: &'static str,
    pub role: Role,
    predicate: fn(&Candidate<'_>, &RuleContext) -> bool,
}

impl Rule {
    pub fn matches(&self, block: &Block, context: &RuleContext) -> bool {
        (self.predicate)(&Candidate::new(block), context)
    }
}

/// Classification rules in priority order
pub static RULES: &[Rule] = &[
    Rule {
        name: "sender_first_block",
        role: Role::Sender,
        predicate: |_, ctx| ctx.position == 0,
    },
    Rule {
        name: "date_lexical",
        role: Role::Date,
        predicate: |c, ctx| !ctx.date_taken && is_date(&c.text),
    },
    Rule {
        name: "salutation_marker",
        role: Role::Salutation,
        predicate: |c, _| is_salutation(&c.text),
    },
    Rule {
        name: "subject_heading",
        role: Role::Subject,
        predicate: |c, _| is_subject(&c.text, &c.block.inner_content),
    },
    Rule {
        name: "recipient_first_remaining",
        role: Role::Recipient,
        predicate: |c, ctx| !ctx.recipient_taken && ctx.position > 0 && !c.text.is_empty(),
    },
    Rule {
        name: "closing_phrase",
        role: Role::Closing,
        predicate: |c, _| is_closing(&c.text),
    },
    Rule {
        name: "body_after_salutation",
        role: Role::Body,
        predicate: |_, ctx| ctx.salutation_seen,
    },
];

fn role_for(candidate: &Candidate<'_>, context: &RuleContext) -> Role {
    RULES
        .iter()
        .find(|rule| (rule.predicate)(candidate, context))
        .map(|rule| rule.role)
        .unwrap_or(Role::Unknown)
}

/// Classify every block of the document, in order
pub fn classify_blocks(document: &Document) -> Vec<ClassifiedBlock> {
    let mut context = RuleContext::default();

    document
        .blocks
        .iter()
        .map(|block| {
            context.position = block.position;
            let candidate = Candidate::new(block);
            let role = role_for(&candidate, &context);
            context.record(role, block);

            tracing::trace!(position = block.position, ?role, "Classified block");

            ClassifiedBlock {
                block: block.clone(),
                role,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::extract_blocks;

    fn roles(markup: &str) -> Vec<Role> {
        let doc = extract_blocks(markup).unwrap();
        classify_blocks(&doc).into_iter().map(|c| c.role).collect()
    }

    fn block(inner: &str, position: usize) -> Block {
        Block {
            raw_markup: format!("<p>{inner}</p>"),
            inner_content: inner.to_string(),
            position,
        }
    }

    #[test]
    fn test_english_letter_roles() {
        let markup = "<p>Ahmad bin Ismail<br>No. 5, Jalan Mawar</p>\
            <p>6 December 2025</p>\
            <p>The Director<br>Jabatan Kerja Raya</p>\
            <p>Dear Sir/Madam,</p>\
            <p>Subject: Damaged road</p>\
            <p>I wish to report a pothole.</p>\
            <p>Yours faithfully,</p>\
            <p>Ahmad bin Ismail</p>";

        assert_eq!(
            roles(markup),
            vec![
                Role::Sender,
                Role::Date,
                Role::Recipient,
                Role::Salutation,
                Role::Subject,
                Role::Body,
                Role::Closing,
                Role::Body,
            ]
        );
    }

    #[test]
    fn test_sender_wins_over_date_like_content() {
        assert_eq!(
            roles("<p>Siti<br>Sent 5 May from Ipoh</p><p>Pengarah</p><p>7 Mei 2025</p>"),
            vec![Role::Sender, Role::Recipient, Role::Date]
        );
    }

    #[test]
    fn test_only_first_date_is_date() {
        assert_eq!(
            roles("<p>Sender</p><p>1 Jan 2025</p><p>2 Feb 2025</p><p>Body</p>"),
            vec![Role::Sender, Role::Date, Role::Recipient, Role::Unknown]
        );
    }

    #[test]
    fn test_recipient_skips_salutation_and_subject() {
        assert_eq!(
            roles("<p>Sender</p><p>Tuan/Puan,</p><p>Perkara: Aduan</p><p>Ketua Pegawai</p>"),
            vec![Role::Sender, Role::Salutation, Role::Subject, Role::Recipient]
        );
    }

    #[test]
    fn test_merged_block_holds_recipient() {
        let merged = format!(
            "<p>Jane Doe{}</p>",
            wrap_right_float("6 December 2025")
        );
        let markup = format!("<p>Sender</p>{merged}<p>Dear Sir/Madam,</p><p>Body text</p>");
        assert_eq!(
            roles(&markup),
            vec![Role::Sender, Role::Date, Role::Salutation, Role::Body]
        );
    }

    #[test]
    fn test_floated_date_alone_leaves_recipient_open() {
        let markup = format!(
            "<p>Sender</p><p>{}</p><p>Encik Lim</p>",
            wrap_right_float("6 Dis 2025")
        );
        assert_eq!(
            roles(&markup),
            vec![Role::Sender, Role::Date, Role::Recipient]
        );
    }

    #[test]
    fn test_rules_in_isolation() {
        let sender_rule = RULES.iter().find(|r| r.role == Role::Sender).unwrap();
        assert!(sender_rule.matches(&block("anything", 0), &RuleContext::default()));

        let date_rule = RULES.iter().find(|r| r.name == "date_lexical").unwrap();
        let ctx = RuleContext {
            position: 2,
            ..RuleContext::default()
        };
        assert!(date_rule.matches(&block("6 December 2025", 2), &ctx));

        let taken = RuleContext {
            date_taken: true,
            ..ctx
        };
        assert!(!date_rule.matches(&block("6 December 2025", 2), &taken));

        let recipient_rule = RULES.iter().find(|r| r.role == Role::Recipient).unwrap();
        assert!(!recipient_rule.matches(&block("Pengarah", 0), &RuleContext::default()));
    }

    #[test]
    fn test_blank_paragraph_is_not_recipient() {
        assert_eq!(
            roles("<p>Sender</p><p></p><p><br></p><p>&nbsp;</p><p>Encik Lim</p>"),
            vec![
                Role::Sender,
                Role::Unknown,
                Role::Unknown,
                Role::Unknown,
                Role::Recipient
            ]
        );
    }

    #[test]
    fn test_single_block_is_sender() {
        assert_eq!(roles("<p>Dear Sir/Madam,</p>"), vec![Role::Sender]);
    }
}
