//! Per-run token assignment.
//!
//! A `TokenSequence` is local to one pipeline run and threaded through the
//! call chain — never a module-level singleton, so concurrent runs cannot
//! contaminate each other's counters.

use draftshield_mask::PiiCategory;

/// Token categories layer 1 can assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Person,
    Org,
    Email,
    Phone,
    Address,
    Pnr,
    Postcode,
    Id,
}

impl From<PiiCategory> for TokenKind {
    fn from(category: PiiCategory) -> Self {
        match category {
            PiiCategory::Pnr => TokenKind::Pnr,
            PiiCategory::Email => TokenKind::Email,
            PiiCategory::Phone => TokenKind::Phone,
            PiiCategory::Postcode => TokenKind::Postcode,
            PiiCategory::Address => TokenKind::Address,
            PiiCategory::Id => TokenKind::Id,
        }
    }
}

/// Per-run counters. Tokens are unique within a run and assigned in
/// first-occurrence order per category: persons and organizations are
/// lettered (`[PERSON_A]`, `[PERSON_B]`), the rest numbered (`[EMAIL_1]`).
#[derive(Debug, Default)]
pub struct TokenSequence {
    person: usize,
    org: usize,
    email: usize,
    phone: usize,
    address: usize,
    pnr: usize,
    postcode: usize,
    id: usize,
}

fn letter_suffix(n: usize) -> String {
    if n <= 26 {
        ((b'A' + (n - 1) as u8) as char).to_string()
    } else {
        n.to_string()
    }
}

impl TokenSequence {
    pub fn next(&mut self, kind: TokenKind) -> String {
        match kind {
            TokenKind::Person => {
                self.person += 1;
                format!("[PERSON_{}]", letter_suffix(self.person))
            }
            TokenKind::Org => {
                self.org += 1;
                format!("[ORG_{}]", letter_suffix(self.org))
            }
            TokenKind::Email => {
                self.email += 1;
                format!("[EMAIL_{}]", self.email)
            }
            TokenKind::Phone => {
                self.phone += 1;
                format!("[PHONE_{}]", self.phone)
            }
            TokenKind::Address => {
                self.address += 1;
                format!("[ADDRESS_{}]", self.address)
            }
            TokenKind::Pnr => {
                self.pnr += 1;
                format!("[PNR_{}]", self.pnr)
            }
            TokenKind::Postcode => {
                self.postcode += 1;
                format!("[POSTCODE_{}]", self.postcode)
            }
            TokenKind::Id => {
                self.id += 1;
                format!("[ID_{}]", self.id)
            }
        }
    }

    /// Total tokens issued so far.
    pub fn issued(&self) -> usize {
        self.person
            + self.org
            + self.email
            + self.phone
            + self.address
            + self.pnr
            + self.postcode
            + self.id
    }
}
