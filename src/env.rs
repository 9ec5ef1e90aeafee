use std::cell::RefCell;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_RUN_INTERVAL: u64 = 100;
const DEFAULT_LIST_ROWS: usize = 9;

#[derive(Clone, Copy)]
struct Env {
    run_interval: Duration,
    list_rows: usize,
}

impl Default for Env {
    fn default() -> Self {
        Self {
            run_interval: Duration::from_millis(DEFAULT_RUN_INTERVAL),
            list_rows: DEFAULT_LIST_ROWS,
        }
    }
}

thread_local! {
    /// Must only be mutated within `set_env`
    static ENV: RefCell<Option<Env>> = const { RefCell::new(None) };
}

pub fn init() {
    let value = Env {
        run_interval: Duration::from_millis(parse_var(
            "GBDB_RUN_INTERVAL",
            std::env::var("GBDB_RUN_INTERVAL").ok(),
            DEFAULT_RUN_INTERVAL,
        )),
        list_rows: parse_var(
            "GBDB_LIST_ROWS",
            std::env::var("GBDB_LIST_ROWS").ok(),
            DEFAULT_LIST_ROWS,
        ),
    };
    set_env(value);
}

/// Delay between auto-run steps.
pub fn run_interval() -> Duration {
    with_env(|env| env.run_interval)
}

/// Rows shown by the instruction list.
pub fn list_rows() -> usize {
    with_env(|env| env.list_rows)
}

fn set_env(value: Env) {
    ENV.with(|env| {
        let mut env = env.borrow_mut();
        assert!(
            env.is_none(),
            "tried to initialize environment state multiple times"
        );
        *env = Some(value);
    });
}

/// Before [`init`], reads see the defaults and ignore the environment.
fn with_env<F, R>(callback: F) -> R
where
    F: Fn(&Env) -> R,
{
    ENV.with(|env| {
        let env = env.borrow().unwrap_or_default();
        callback(&env)
    })
}

/// Unset or unparsable values fall back to `default`.
fn parse_var<T>(name: &str, value: Option<String>, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = value else {
        return default;
    };
    match value.trim().parse() {
        Ok(value) => value,
        Err(error) => {
            log::warn!("Ignoring ${}=`{}`: {}", name, value, error);
            default
        }
    }
}
