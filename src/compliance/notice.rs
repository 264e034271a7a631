//! Disclaimer text shown before signature capture.

use super::types::{ComplianceNotice, Jurisdiction, NoticeSection, SectionKind, SignatureLevel};

const TITLE: &str = "Electronic Signature Notice";

const PURPOSE: &[&str] = &[
    "You are about to sign the document shown to you electronically by drawing your signature.",
    "Your drawn signature will be bound to your name, your e-mail address and a fingerprint of the document, and has the same intent as a handwritten signature on paper.",
];

const RESPONSIBILITIES: &[&str] = &[
    "Sign only if you have read the document and agree to its content.",
    "Sign only as yourself, using the e-mail address the invitation was sent to. Do not forward your signing link.",
    "Keep a copy of the signed document and its verification code for your records.",
];

const DATA_RECORDED: &[&str] = &[
    "Your signature image, name, e-mail address and role, the time of signing, your IP address and browser details, and a hash of the document.",
    "A verification code derived from these details is printed with the signed document so its integrity can be confirmed later.",
];

const CONTEST_COMMON: &[&str] = &[
    "If you believe a signature attributed to you was not made by you, or the document was altered after signing, contact the issuing organisation and quote the verification code.",
    "The organisation will compare the stored record against the document; any change to the document after signing is detectable.",
];

/// Build the compliance notice for a jurisdiction.
///
/// The ceremony produces an advanced-style signature record; it is not a
/// qualified electronic signature backed by a trust service provider.
pub fn compliance_notice(jurisdiction: Jurisdiction) -> ComplianceNotice {
    let legal_basis: &[&'static str] = match jurisdiction {
        Jurisdiction::Eu => &[
            "This electronic signature is provided under Regulation (EU) No 910/2014 (eIDAS). Under Article 25(1) it may not be denied legal effect or admissibility as evidence solely because it is in electronic form.",
            "It is not a qualified electronic signature and does not carry the presumption of equivalence to a handwritten signature under Article 25(2). Documents requiring a statutory written form may need a different signing method.",
            "Personal data recorded with your signature is processed under Article 6(1)(b) GDPR for the performance of the contract.",
        ],
        Jurisdiction::Us => &[
            "This electronic signature is provided under the Electronic Signatures in Global and National Commerce Act (15 U.S.C. 7001 et seq.) and the Uniform Electronic Transactions Act as adopted by your state.",
            "A signature or record may not be denied legal effect solely because it is in electronic form. You may request a paper copy of the document and may withdraw consent to electronic records before signing.",
        ],
        Jurisdiction::Generic => &[
            "This electronic signature records your intent to sign and is intended to have the same effect as a handwritten signature to the extent permitted by applicable law.",
            "It is not a qualified or certificate-based digital signature.",
        ],
    };

    let mut contest: Vec<&'static str> = CONTEST_COMMON.to_vec();
    if jurisdiction == Jurisdiction::Eu {
        contest.push("You may also exercise your rights of access and rectification under Articles 15 and 16 GDPR.");
    }

    let notice = ComplianceNotice {
        title: TITLE,
        jurisdiction,
        level: SignatureLevel::Advanced,
        sections: vec![
            NoticeSection {
                kind: SectionKind::Purpose,
                paragraphs: PURPOSE.to_vec(),
            },
            NoticeSection {
                kind: SectionKind::LegalBasis,
                paragraphs: legal_basis.to_vec(),
            },
            NoticeSection {
                kind: SectionKind::SignerResponsibilities,
                paragraphs: RESPONSIBILITIES.to_vec(),
            },
            NoticeSection {
                kind: SectionKind::DataRecorded,
                paragraphs: DATA_RECORDED.to_vec(),
            },
            NoticeSection {
                kind: SectionKind::HowToContest,
                paragraphs: contest,
            },
        ],
    };

    log::trace!("Built {} compliance notice", jurisdiction.code());
    notice
}
