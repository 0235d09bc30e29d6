//! vrcladder
//! =========
//!
//! A ladder league for volleyball pairs: players form two-person teams, declare which time slot
//! they are playing each week, and get grouped onto courts by ladder rank.
//!
//! Hacking
//! -------
//!
//! This follows the approach laid out in
//! ["Stateless MVC"](https://www.tedinski.com/2018/09/11/stateless-mvc.html). The validators and
//! the roster view-model in `logic` are pure functions over `schema` types; everything that
//! touches state lives behind the `dal::Store` trait.
#![deny(
    bad_style,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    missing_debug_implementations,
    missing_docs,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    while_true
)]
#![warn(dead_code, unused, unused_results)]

#[macro_use]
pub mod util;

pub mod dal;
pub mod logic;
pub mod router;
pub mod schema;
pub mod view;
