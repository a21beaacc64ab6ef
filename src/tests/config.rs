use std::collections::HashMap;
use std::num::NonZeroUsize;

use crate::config::{CONCURRENCY_VAR, REPLAY_VAR, VET_VAR};
use crate::{Concurrency, Config, Error};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn unset_variables_keep_defaults() {
    let config = Config::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, Config::default());
    assert!(!config.vet);
    assert!(!config.replay);
}

#[test]
fn concurrency_values() {
    let parse =
        |raw: &str| Config::from_lookup(lookup(&[(CONCURRENCY_VAR, raw)])).map(|c| c.concurrency);

    assert_eq!(parse("off").unwrap(), Concurrency::Off);
    assert_eq!(parse("OFF").unwrap(), Concurrency::Off);
    assert_eq!(parse("0").unwrap(), Concurrency::Off);
    assert_eq!(parse("1").unwrap(), Concurrency::Off);
    assert_eq!(parse(" 6 ").unwrap(), Concurrency::Ceiling(NonZeroUsize::new(6).unwrap()));
    assert_eq!(parse("6").unwrap().ceiling(), 6);
    assert_eq!(Concurrency::Off.ceiling(), 1);
    assert!(matches!(parse("lots"), Err(Error::Config(_))));
    assert!(matches!(parse("-2"), Err(Error::Config(_))));
}

#[test]
fn toggles() {
    let config = Config::from_lookup(lookup(&[(VET_VAR, "1"), (REPLAY_VAR, "yes")])).unwrap();
    assert!(config.vet);
    assert!(config.replay);

    let config = Config::from_lookup(lookup(&[(VET_VAR, "false"), (REPLAY_VAR, "")])).unwrap();
    assert!(!config.vet);
    assert!(!config.replay);

    let err = Config::from_lookup(lookup(&[(VET_VAR, "sometimes")])).unwrap_err();
    assert!(err.to_string().contains(VET_VAR));
}
