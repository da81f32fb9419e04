//! Contract assertions with symbolic stack traces.
//!
//! [`contract_assert!`] guards preconditions that only a programming error can
//! violate (for example limb arrays of different lengths). On failure it logs
//! the violation, writes the call site, the failed condition, a formatted
//! message and a demangled backtrace to stderr, then aborts the process. There
//! is no unwinding and no recovery.

use core::fmt;
use std::backtrace::Backtrace;

/// Static description of the place where a contract was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site {
    /// Source text of the asserted condition.
    pub condition: &'static str,
    /// Fully qualified name of the enclosing function.
    pub function: &'static str,
    /// Source file reported by `file!()`.
    pub file: &'static str,
    /// Source line reported by `line!()`.
    pub line: u32,
}

/// A failed contract together with its rendered message.
#[derive(Debug)]
pub struct ContractViolation {
    site: Site,
    message: String,
    backtrace: Option<Backtrace>,
}

impl ContractViolation {
    /// Builds a violation report, capturing the current stack.
    pub fn capture(site: Site, message: fmt::Arguments<'_>) -> Self {
        Self {
            site,
            message: message.to_string(),
            backtrace: Some(Backtrace::force_capture()),
        }
    }

    /// Builds a violation report without a stack trace.
    pub fn without_backtrace(site: Site, message: fmt::Arguments<'_>) -> Self {
        Self {
            site,
            message: message.to_string(),
            backtrace: None,
        }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Renders the single-line header `file:line (function): Assertion ...`.
    pub fn header(&self) -> String {
        format!(
            "{}:{} ({}): Assertion `{}' failed: {}",
            self.site.file, self.site.line, self.site.function, self.site.condition, self.message
        )
    }
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header())?;
        if let Some(backtrace) = &self.backtrace {
            write!(f, "\n{backtrace}")?;
        }
        Ok(())
    }
}

/// Reports a failed contract and aborts the process.
#[cold]
#[inline(never)]
pub fn contract_failed(site: Site, message: fmt::Arguments<'_>) -> ! {
    let violation = ContractViolation::capture(site, message);
    tracing::error!(
        file = site.file,
        line = site.line,
        function = site.function,
        condition = site.condition,
        "contract violated"
    );
    eprintln!("{violation}");
    std::process::abort()
}

/// Expands to the fully qualified path of the enclosing function.
#[doc(hidden)]
#[macro_export]
macro_rules! function_name {
    () => {{
        fn here() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        let name = type_name_of(here);
        name.strip_suffix("::here").unwrap_or(name)
    }};
}

/// Aborts with a diagnostic and backtrace when `condition` is false.
///
/// ```ignore
/// contract_assert!(lhs.len() == rhs.len(), "length mismatch ({} vs {})", lhs.len(), rhs.len());
/// ```
#[macro_export]
macro_rules! contract_assert {
    ($condition:expr, $($arg:tt)+) => {
        if !$condition {
            $crate::contract::contract_failed(
                $crate::contract::Site {
                    condition: stringify!($condition),
                    function: $crate::function_name!(),
                    file: file!(),
                    line: line!(),
                },
                format_args!($($arg)+),
            )
        }
    };
}
