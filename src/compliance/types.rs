//! Compliance notice types and data structures.

use std::fmt;

/// Legal framework the notice is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Jurisdiction {
    /// European Union (eIDAS, GDPR)
    Eu,
    /// United States (ESIGN Act, UETA)
    Us,
    /// No specific framework
    #[default]
    Generic,
}

impl Jurisdiction {
    /// Short code used in logs and rendered notices.
    pub fn code(&self) -> &'static str {
        match self {
            Jurisdiction::Eu => "EU",
            Jurisdiction::Us => "US",
            Jurisdiction::Generic => "GENERIC",
        }
    }
}

/// Assurance level of the produced signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureLevel {
    /// Simple electronic signature: any electronic mark of intent
    Simple,
    /// Advanced electronic signature: uniquely linked to and identifying the
    /// signer, with subsequent changes detectable
    Advanced,
}

impl SignatureLevel {
    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            SignatureLevel::Simple => "simple electronic signature",
            SignatureLevel::Advanced => "advanced electronic signature",
        }
    }
}

/// Heading of a notice section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// What the electronic signature is used for
    Purpose,
    /// Statutory basis for its validity
    LegalBasis,
    /// What the signer confirms and must do
    SignerResponsibilities,
    /// How to dispute a signature
    HowToContest,
    /// What data is recorded
    DataRecorded,
}

impl SectionKind {
    /// Section heading.
    pub fn heading(&self) -> &'static str {
        match self {
            SectionKind::Purpose => "Purpose of your electronic signature",
            SectionKind::LegalBasis => "Legal basis",
            SectionKind::SignerResponsibilities => "Your responsibilities",
            SectionKind::HowToContest => "How to contest a signature",
            SectionKind::DataRecorded => "Data recorded with your signature",
        }
    }
}

/// One section of a compliance notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeSection {
    /// Section kind
    pub kind: SectionKind,
    /// Paragraphs of body text
    pub paragraphs: Vec<&'static str>,
}

/// Disclaimer shown before signature capture begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceNotice {
    /// Notice title
    pub title: &'static str,
    /// Jurisdiction the text is written for
    pub jurisdiction: Jurisdiction,
    /// Signature level the ceremony produces
    pub level: SignatureLevel,
    /// Sections in display order
    pub sections: Vec<NoticeSection>,
}

impl ComplianceNotice {
    /// Look up a section by kind.
    pub fn section(&self, kind: SectionKind) -> Option<&NoticeSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Render the notice as plain text.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ComplianceNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.len()))?;
        writeln!(f, "Jurisdiction: {} | Level: {}", self.jurisdiction.code(), self.level.name())?;

        for (i, section) in self.sections.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "{}. {}", i + 1, section.kind.heading())?;
            for paragraph in &section.paragraphs {
                writeln!(f, "   {}", paragraph)?;
            }
        }
        Ok(())
    }
}
