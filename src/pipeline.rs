use std::io;

use thiserror::Error;

use crate::dns::{DnsError, DomainResolver, ResolverOptions, SystemResolver, check_domain};
use crate::mx::{MxRecord, check_mx_records};
use crate::report::{CheckResult, Stage, ValidationReport};
use crate::smtp::{self, SmtpProbeOptions};
use crate::syntax::{SYNTAX_OK, parse_email};

/// Everything a [`EmailValidator`] can be tuned with.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(default))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorOptions {
    pub resolver: ResolverOptions,
    pub smtp: SmtpProbeOptions,
}

#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: io::Error,
    },
}

/// Runs the stages in order (syntax, domain, mx_records, then smtp when
/// asked) and stops at the first failing one.
pub struct EmailValidator<R = SystemResolver> {
    resolver: R,
    options: ValidatorOptions,
}

impl EmailValidator<SystemResolver> {
    pub fn from_system_conf(options: ValidatorOptions) -> Result<Self, ValidatorError> {
        let resolver = SystemResolver::with_options(&options.resolver)
            .map_err(|source| ValidatorError::ResolverInit { source })?;
        Ok(Self::new(resolver, options))
    }
}

impl<R: DomainResolver> EmailValidator<R> {
    pub fn new(resolver: R, options: ValidatorOptions) -> Self {
        Self { resolver, options }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Never fails: every stage converts its own errors into a failed
    /// [`CheckResult`].
    pub fn validate(&self, email: &str, check_smtp: bool) -> ValidationReport {
        let _span = tracing::debug_span!("validate", email, check_smtp).entered();
        let mut report = ValidationReport::new(email);

        let address = match parse_email(email) {
            Ok(address) => {
                report.record(Stage::Syntax, CheckResult::pass(SYNTAX_OK));
                address
            }
            Err(err) => {
                tracing::debug!(error = %err, "syntax check failed");
                report.record(Stage::Syntax, CheckResult::fail(err.to_string()));
                return finish(report);
            }
        };

        if !report.record(Stage::Domain, check_domain(&self.resolver, address.domain())) {
            return finish(report);
        }

        if !report.record(
            Stage::MxRecords,
            check_mx_records(&self.resolver, address.domain()),
        ) {
            return finish(report);
        }

        if check_smtp {
            let result = smtp::check_smtp(&self.resolver, &address, &self.options.smtp);
            report.record(Stage::Smtp, result);
        }

        finish(report)
    }
}

fn finish(report: ValidationReport) -> ValidationReport {
    tracing::info!(
        email = %report.email,
        overall_valid = report.overall_valid,
        stages = report.checks.len(),
        "validation finished"
    );
    report
}

/// Validate `email` with the system resolver and default options.
pub fn validate(email: &str, check_smtp: bool) -> ValidationReport {
    validate_with_options(email, check_smtp, &ValidatorOptions::default())
}

/// Like [`validate`]. If the system resolver cannot be set up, the report
/// carries the failure in its `domain` stage.
pub fn validate_with_options(
    email: &str,
    check_smtp: bool,
    options: &ValidatorOptions,
) -> ValidationReport {
    match EmailValidator::from_system_conf(options.clone()) {
        Ok(validator) => validator.validate(email, check_smtp),
        Err(err) => {
            tracing::warn!(error = %err, "falling back to an unavailable resolver");
            EmailValidator::new(UnavailableResolver(err.to_string()), options.clone())
                .validate(email, check_smtp)
        }
    }
}

/// Stand-in used when the system resolver could not be built.
struct UnavailableResolver(String);

impl UnavailableResolver {
    fn error(&self) -> DnsError {
        DnsError::Other(self.0.clone())
    }
}

impl DomainResolver for UnavailableResolver {
    fn resolve_a(&self, _domain: &str) -> Result<bool, DnsError> {
        Err(self.error())
    }

    fn resolve_aaaa(&self, _domain: &str) -> Result<bool, DnsError> {
        Err(self.error())
    }

    fn resolve_mx(&self, _domain: &str) -> Result<Vec<MxRecord>, DnsError> {
        Err(self.error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::tests::StubResolver;
    use proptest::prelude::*;
    use std::net::TcpListener;

    fn validator(stub: StubResolver) -> EmailValidator<StubResolver> {
        EmailValidator::new(stub, ValidatorOptions::default())
    }

    fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    }

    #[test]
    fn deliverable_domain_passes_three_stages() {
        let v = validator(StubResolver::mail_domain(&[
            (10, "mx1.example.com."),
            (20, "mx2.example.com."),
        ]));
        let report = v.validate("user@example.com", false);
        assert!(report.overall_valid);
        assert_eq!(
            report.checks.stages(),
            vec![Stage::Syntax, Stage::Domain, Stage::MxRecords]
        );
        assert!(report.checks.iter().all(|(_, r)| r.valid));
        assert_eq!(
            report.checks.get(Stage::MxRecords).unwrap().message,
            "MX records found: mx1.example.com, mx2.example.com"
        );
        assert_eq!(v.resolver().queries(), vec!["A example.com", "MX example.com"]);
    }

    #[test]
    fn consecutive_dots_stop_at_syntax() {
        let v = validator(StubResolver::mail_domain(&[(10, "mx.domain.com")]));
        let report = v.validate("user..name@domain.com", false);
        assert!(!report.overall_valid);
        assert_eq!(report.checks.len(), 1);
        assert_eq!(
            report.checks.get(Stage::Syntax).unwrap().message,
            "Email contains consecutive dots"
        );
        assert!(v.resolver().queries().is_empty());
    }

    #[test]
    fn missing_domain_is_invalid_format() {
        let v = validator(StubResolver::new());
        let report = v.validate("invalid.email@", false);
        assert!(!report.overall_valid);
        assert_eq!(report.email, "invalid.email@");
        assert_eq!(report.checks.stages(), vec![Stage::Syntax]);
        assert_eq!(
            report.checks.get(Stage::Syntax).unwrap().message,
            "Invalid email format"
        );
    }

    #[test]
    fn unresolvable_domain_stops_at_domain() {
        let v = validator(StubResolver::nxdomain());
        let report = v.validate("test@nonexistentdomain12345.com", true);
        assert!(!report.overall_valid);
        assert_eq!(report.checks.stages(), vec![Stage::Syntax, Stage::Domain]);
        assert!(report.checks.get(Stage::Syntax).unwrap().valid);
        assert!(!report.checks.get(Stage::Domain).unwrap().valid);
        assert!(!report.checks.contains(Stage::MxRecords));
        assert!(!report.checks.contains(Stage::Smtp));
    }

    #[test]
    fn a_without_mx_stops_at_mx_records() {
        let v = validator(StubResolver::new().with_a(Ok(true)));
        let report = v.validate("user@no-mail.example", true);
        assert!(!report.overall_valid);
        assert_eq!(
            report.checks.stages(),
            vec![Stage::Syntax, Stage::Domain, Stage::MxRecords]
        );
        assert!(!report.checks.get(Stage::MxRecords).unwrap().valid);
        assert!(!report.checks.contains(Stage::Smtp));
    }

    #[test]
    fn smtp_failure_is_folded_into_verdict() {
        let options = ValidatorOptions {
            smtp: SmtpProbeOptions {
                port: closed_port(),
                timeout_ms: 2_000,
                ..SmtpProbeOptions::default()
            },
            ..ValidatorOptions::default()
        };
        let v = EmailValidator::new(StubResolver::mail_domain(&[(10, "127.0.0.1")]), options);
        let report = v.validate("user@example.com", true);
        assert!(!report.overall_valid);
        assert_eq!(
            report.checks.stages(),
            vec![Stage::Syntax, Stage::Domain, Stage::MxRecords, Stage::Smtp]
        );
        let smtp = report.checks.get(Stage::Smtp).unwrap();
        assert!(!smtp.valid);
        assert!(smtp.message.starts_with("Could not connect to 127.0.0.1"), "{}", smtp.message);
        assert!(report.checks.get(Stage::MxRecords).unwrap().valid);
    }

    #[test]
    fn unavailable_resolver_reports_domain_failure() {
        let v = EmailValidator::new(
            UnavailableResolver("resolver initialization failed: no resolv.conf".into()),
            ValidatorOptions::default(),
        );
        let report = v.validate("user@example.com", false);
        assert!(!report.overall_valid);
        assert_eq!(report.checks.stages(), vec![Stage::Syntax, Stage::Domain]);
        assert_eq!(
            report.checks.get(Stage::Domain).unwrap().message,
            "DNS error: resolver initialization failed: no resolv.conf"
        );
    }

    proptest! {
        #[test]
        fn repeated_validation_is_identical(
            local in "[a-z0-9.]{0,12}",
            domain in "[a-z0-9.-]{0,12}",
            with_at in any::<bool>(),
        ) {
            let email = if with_at { format!("{local}@{domain}") } else { format!("{local}{domain}") };
            let v = validator(StubResolver::mail_domain(&[(10, "mx.example.com")]));
            let first = v.validate(&email, false);
            let second = v.validate(&email, false);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn syntax_failures_never_reach_dns(s in "[^@]{0,30}") {
            let v = validator(StubResolver::mail_domain(&[(10, "mx.example.com")]));
            let report = v.validate(&s, false);
            prop_assert!(!report.overall_valid);
            prop_assert_eq!(report.checks.stages(), vec![Stage::Syntax]);
            prop_assert!(v.resolver().queries().is_empty());
        }
    }
}
