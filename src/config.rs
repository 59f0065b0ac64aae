//! Reader and evaluator policies
use std::env::var;

const DEFAULT_MAX_DEPTH: usize = 512;

/// What happens when a closure is called with the wrong number of arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArityPolicy {
    /// Missing parameters stay unbound, extra arguments are dropped
    Lenient,
    /// Any mismatch is an `ArityMismatch` error
    Strict,
}

/// Where closure parameters get bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoping {
    /// Every call gets a fresh frame whose parent is the closure's frame
    Lexical,
    /// Parameters are bound straight into the session's single table
    Flat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Fold identifiers to lowercase while reading
    pub fold_case: bool,
    pub arity: ArityPolicy,
    pub scoping: Scoping,
    /// Maximum nesting of call forms before `StackOverflow`
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            fold_case: false,
            arity: ArityPolicy::Lenient,
            scoping: Scoping::Lexical,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Reads `YAP_FOLD_CASE`, `YAP_STRICT_ARITY`, `YAP_FLAT_SCOPE` and `YAP_MAX_DEPTH`
    pub fn from_env() -> Config {
        Config::from_lookup(|name| var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |name: &str| lookup(name).map(|s| !s.is_empty()).unwrap_or(false);
        let mut config = Config::default();

        config.fold_case = flag("YAP_FOLD_CASE");
        if flag("YAP_STRICT_ARITY") {
            config.arity = ArityPolicy::Strict;
        }
        if flag("YAP_FLAT_SCOPE") {
            config.scoping = Scoping::Flat;
        }
        match lookup("YAP_MAX_DEPTH").map(|s| s.trim().parse::<usize>()) {
            Some(Ok(depth)) if depth > 0 => config.max_depth = depth,
            Some(_) => warn!("ignoring invalid YAP_MAX_DEPTH"),
            None => {}
        }

        config
    }
}
