//! Statements about listener behaviour and their verification.

use std::fmt;

use reqwest::Method;

use twin_listeners::handlers::{API_METHOD_NOT_ALLOWED, REQUEST_COMPLETED, TEXT_HTML};
use twin_listeners::ListenerKind;

use crate::client::{Observed, Verifier};

/// One request and the response it must produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    pub target: ListenerKind,
    pub method: Method,
    pub path: &'static str,
    pub status: u16,
    pub body: &'static str,
}

impl Expectation {
    /// Request that must be answered with the shared success response.
    pub fn completed(target: ListenerKind, method: Method, path: &'static str) -> Self {
        Self {
            target,
            method,
            path,
            status: 200,
            body: REQUEST_COMPLETED,
        }
    }

    /// API request that must be rejected with 405.
    pub fn rejected(method: Method, path: &'static str) -> Self {
        Self {
            target: ListenerKind::Api,
            method,
            path,
            status: 405,
            body: API_METHOD_NOT_ALLOWED,
        }
    }

    /// Describes how `observed` differs from the expectation, if it does.
    pub fn mismatch(&self, observed: &Observed) -> Option<String> {
        let mut problems = Vec::new();
        if observed.status != self.status {
            problems.push(format!("status {} (expected {})", observed.status, self.status));
        }
        if observed.content_type.as_deref() != Some(TEXT_HTML) {
            problems.push(format!(
                "content type {:?} (expected {:?})",
                observed.content_type, TEXT_HTML
            ));
        }
        if observed.body != self.body {
            problems.push(format!("body {:?} (expected {:?})", observed.body, self.body));
        }

        if problems.is_empty() {
            None
        } else {
            Some(format!("{}: {}", self, problems.join(", ")))
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.target, self.method, self.path)
    }
}

/// A claim about the listeners, backed by one or more expectations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub description: &'static str,
    pub expectations: Vec<Expectation>,
}

impl Statement {
    /// The statements checked by a verification run.
    pub fn all() -> Vec<Statement> {
        vec![
            Statement {
                description: "Web listener handles GET, POST, and PUT",
                expectations: vec![
                    Expectation::completed(ListenerKind::Web, Method::GET, "/"),
                    Expectation::completed(ListenerKind::Web, Method::POST, "/"),
                    Expectation::completed(ListenerKind::Web, Method::PUT, "/"),
                ],
            },
            Statement {
                description: "API listener handles POST",
                expectations: vec![Expectation::completed(
                    ListenerKind::Api,
                    Method::POST,
                    "/",
                )],
            },
            Statement {
                description: "API listener rejects GET with 405",
                expectations: vec![Expectation::rejected(Method::GET, "/")],
            },
            Statement {
                description: "Web listener handles a request with a query string",
                expectations: vec![Expectation::completed(
                    ListenerKind::Web,
                    Method::GET,
                    "/test?param=value",
                )],
            },
        ]
    }
}

/// Result of checking one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementOutcome {
    pub description: &'static str,
    pub failures: Vec<String>,
}

impl StatementOutcome {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for StatementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            write!(f, "  [PASS] {}.", self.description)
        } else {
            write!(f, "  [FAIL] {}.", self.description)?;
            for failure in &self.failures {
                write!(f, "\n         {}", failure)?;
            }
            Ok(())
        }
    }
}

/// Outcomes of a verification run, in statement order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub outcomes: Vec<StatementOutcome>,
}

impl Report {
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(StatementOutcome::passed)
    }

    pub fn summary(&self) -> &'static str {
        if self.all_passed() {
            "All statements verified!"
        } else {
            "Some statements failed verification."
        }
    }
}

impl Verifier {
    /// Checks a single statement. Transport errors count as failures.
    pub async fn check(&self, statement: &Statement) -> StatementOutcome {
        let mut failures = Vec::new();
        for expectation in &statement.expectations {
            let observed = self
                .make_request(expectation.target, expectation.method.clone(), expectation.path)
                .await;
            match observed {
                Ok(observed) => failures.extend(expectation.mismatch(&observed)),
                Err(err) => failures.push(format!("{}: {}", expectation, err)),
            }
        }

        StatementOutcome {
            description: statement.description,
            failures,
        }
    }

    /// Checks every statement, printing a PASS/FAIL line for each.
    pub async fn verify_statements(&self) -> Report {
        println!("\n=== Verifying Statements ===");
        let mut report = Report::default();
        for statement in Statement::all() {
            println!("Testing: {}...", statement.description);
            let outcome = self.check(&statement).await;
            println!("{}", outcome);
            report.outcomes.push(outcome);
        }
        println!("\nVerification Result: {}", report.summary());
        report
    }
}
