//! Signing ceremony orchestration.
//!
//! Provides `SigningService` for hosts and `SigningCeremony` for one signer's
//! pass from token validation through notice, capture and binding.

use crate::capture::{RenderConfig, SignatureCapture};
use crate::compliance::{compliance_notice, ComplianceNotice, Jurisdiction};
use crate::error::{Error, Result};
use crate::signatures::{DigitalSignatureRecord, SignatureBinder, Signer, SigningContext};
use crate::tokens::{Clock, TokenContext, TokenPayload, TokenPolicy, TokenPurpose};

/// Entry point for hosts running signing ceremonies.
#[derive(Debug)]
pub struct SigningService {
    policy: TokenPolicy,
    binder: SignatureBinder,
    render: RenderConfig,
}

impl SigningService {
    /// Create a service from a token policy and binder.
    pub fn new(policy: TokenPolicy, binder: SignatureBinder) -> Self {
        Self {
            policy,
            binder,
            render: RenderConfig::default(),
        }
    }

    /// Set the canvas configuration used for new ceremonies.
    pub fn with_render_config(mut self, render: RenderConfig) -> Result<Self> {
        render.validate()?;
        self.render = render;
        Ok(self)
    }

    /// Token policy used by this service.
    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// A signing context stamped by the token policy's clock.
    ///
    /// Use this instead of [`SigningContext::now`] so signing time and token
    /// expiry are read from the same source.
    pub fn context(&self) -> SigningContext {
        SigningContext::new(self.policy.codec().clock().now())
    }

    /// Issue a contract signing invitation for an authenticated subject.
    pub fn invite(&self, subject_id: &str, email: &str, context: Option<TokenContext>) -> Result<String> {
        self.policy
            .issue(subject_id, email, TokenPurpose::ContractSigning, context, None)
    }

    /// Open a ceremony for a signer returning with `token`.
    ///
    /// Every token failure is reported as [`Error::InvalidToken`]; the precise
    /// reason is only logged.
    pub fn start(&self, token: &str, jurisdiction: Jurisdiction) -> Result<SigningCeremony<'_>> {
        let payload = self
            .policy
            .validate(token, Some(TokenPurpose::ContractSigning))
            .ok_or(Error::InvalidToken)?;

        let capture = SignatureCapture::with_config(self.render.clone())?;
        log::info!("Started signing ceremony for subject {}", payload.subject_id);

        Ok(SigningCeremony {
            service: self,
            token: token.to_string(),
            payload,
            notice: compliance_notice(jurisdiction),
            acknowledged: false,
            completed: false,
            capture,
        })
    }
}

/// One signer's ceremony.
#[derive(Debug)]
pub struct SigningCeremony<'a> {
    service: &'a SigningService,
    token: String,
    payload: TokenPayload,
    notice: ComplianceNotice,
    acknowledged: bool,
    completed: bool,
    capture: SignatureCapture,
}

impl SigningCeremony<'_> {
    /// Validated token payload the ceremony was opened with.
    pub fn payload(&self) -> &TokenPayload {
        &self.payload
    }

    /// Notice to display before capture.
    pub fn notice(&self) -> &ComplianceNotice {
        &self.notice
    }

    /// A signing context stamped by the service clock.
    pub fn context(&self) -> SigningContext {
        self.service.context()
    }

    /// Record that the signer has read the notice.
    pub fn acknowledge_notice(&mut self) {
        self.acknowledged = true;
    }

    /// Whether the notice has been acknowledged.
    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    /// Whether a record has already been produced.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Stroke capture for this ceremony.
    pub fn capture(&self) -> &SignatureCapture {
        &self.capture
    }

    /// Mutable stroke capture for feeding pointer input.
    pub fn capture_mut(&mut self) -> &mut SignatureCapture {
        &mut self.capture
    }

    /// Export the signature and bind it into a record.
    ///
    /// The token is re-validated first, so a link that expired while the
    /// signer was drawing is rejected. On any error nothing is produced and
    /// the signer may correct the input and try again.
    pub fn finish(
        &mut self,
        signer: &Signer,
        document_id: &str,
        document_hash: &str,
        context: SigningContext,
    ) -> Result<DigitalSignatureRecord> {
        if self.completed {
            return Err(Error::InvalidInput("signing ceremony already completed".to_string()));
        }
        if !self.acknowledged {
            return Err(Error::NoticeNotAcknowledged);
        }

        let payload = self
            .service
            .policy
            .validate(&self.token, Some(TokenPurpose::ContractSigning))
            .ok_or(Error::InvalidToken)?;

        let image = self.capture.export_image()?;
        let context = context.with_token(payload);
        let record = self
            .service
            .binder
            .bind(&image, signer, document_id, document_hash, &context)?;

        self.completed = true;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::StrokePoint;
    use crate::config::TokenConfig;
    use crate::signatures::SignerRole;
    use crate::tokens::{KdfParams, ManualClock, TokenSecret};
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn service() -> (SigningService, Arc<ManualClock>) {
        let config =
            TokenConfig::new(TokenSecret::new(vec![5u8; 32]).unwrap()).with_kdf(KdfParams::fast());
        let clock = Arc::new(ManualClock::starting_now());
        let policy = TokenPolicy::new(&config).unwrap().with_clock(clock.clone());
        (SigningService::new(policy, SignatureBinder::new()), clock)
    }

    fn draw(ceremony: &mut SigningCeremony<'_>) {
        let capture = ceremony.capture_mut();
        capture.begin_stroke(StrokePoint::new(20.0, 20.0)).unwrap();
        capture.extend_stroke(StrokePoint::new(120.0, 80.0)).unwrap();
        capture.end_stroke();
    }

    fn signer() -> Signer {
        Signer::new("Ada Lovelace", "a@x.com", SignerRole::Employee)
    }

    #[test]
    fn test_full_ceremony() {
        let (service, _) = service();
        let token = service.invite("u1", "a@x.com", None).unwrap();

        let mut ceremony = service.start(&token, Jurisdiction::Eu).unwrap();
        assert_eq!(ceremony.payload().subject_id, "u1");
        ceremony.acknowledge_notice();
        draw(&mut ceremony);

        let ctx = ceremony.context();
        let record = ceremony.finish(&signer(), "doc-1", "h1", ctx).unwrap();
        assert!(record.is_verified());
        assert!(ceremony.is_completed());

        let ctx = ceremony.context();
        let again = ceremony.finish(&signer(), "doc-1", "h1", ctx);
        assert!(matches!(again, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_signing_time_follows_policy_clock() {
        let (service, clock) = service();
        clock.set(Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());
        let token = service.invite("u1", "a@x.com", None).unwrap();
        let mut ceremony = service.start(&token, Jurisdiction::Eu).unwrap();
        ceremony.acknowledge_notice();
        draw(&mut ceremony);

        clock.advance(Duration::minutes(5));
        let ctx = ceremony.context();
        assert_eq!(ctx.timestamp, clock.now());

        let record = ceremony.finish(&signer(), "doc-1", "h1", ctx).unwrap();
        assert_eq!(record.signed_at(), Utc.with_ymd_and_hms(2024, 2, 29, 12, 5, 0).unwrap());
    }

    #[test]
    fn test_start_hides_token_failure_reason() {
        let (service, _) = service();
        let reset = service
            .policy()
            .issue("u1", "a@x.com", TokenPurpose::PasswordReset, None, None)
            .unwrap();
        assert!(matches!(service.start(&reset, Jurisdiction::Generic), Err(Error::InvalidToken)));
        assert!(matches!(service.start("junk", Jurisdiction::Generic), Err(Error::InvalidToken)));
    }

    #[test]
    fn test_notice_must_be_acknowledged() {
        let (service, _) = service();
        let token = service.invite("u1", "a@x.com", None).unwrap();
        let mut ceremony = service.start(&token, Jurisdiction::Us).unwrap();
        draw(&mut ceremony);

        let ctx = ceremony.context();
        let result = ceremony.finish(&signer(), "doc-1", "h1", ctx);
        assert!(matches!(result, Err(Error::NoticeNotAcknowledged)));
        assert!(!ceremony.is_completed());
    }

    #[test]
    fn test_empty_capture_is_missing_signature() {
        let (service, _) = service();
        let token = service.invite("u1", "a@x.com", None).unwrap();
        let mut ceremony = service.start(&token, Jurisdiction::Eu).unwrap();
        ceremony.acknowledge_notice();

        let ctx = ceremony.context();
        let result = ceremony.finish(&signer(), "doc-1", "h1", ctx);
        assert!(matches!(result, Err(Error::MissingSignature)));
    }

    #[test]
    fn test_token_expiring_mid_ceremony() {
        let (service, clock) = service();
        let token = service.invite("u1", "a@x.com", None).unwrap();
        let mut ceremony = service.start(&token, Jurisdiction::Eu).unwrap();
        ceremony.acknowledge_notice();
        draw(&mut ceremony);

        clock.advance(Duration::hours(169));
        let ctx = ceremony.context();
        let result = ceremony.finish(&signer(), "doc-1", "h1", ctx);
        assert!(matches!(result, Err(Error::InvalidToken)));
    }

    #[test]
    fn test_wrong_signer_can_retry() {
        let (service, _) = service();
        let token = service.invite("u1", "a@x.com", None).unwrap();
        let mut ceremony = service.start(&token, Jurisdiction::Eu).unwrap();
        ceremony.acknowledge_notice();
        draw(&mut ceremony);

        let imposter = Signer::new("Eve", "eve@x.com", SignerRole::Employee);
        let ctx = ceremony.context();
        let result = ceremony.finish(&imposter, "doc-1", "h1", ctx);
        assert!(matches!(result, Err(Error::IdentityMismatch { .. })));
        assert!(!ceremony.is_completed());

        let ctx = ceremony.context();
        assert!(ceremony.finish(&signer(), "doc-1", "h1", ctx).is_ok());
    }
}
