//! Tests for identifier quoting

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_quote_ident_wraps_in_backticks() {
    assert_eq!(quote_ident("users"), "`users`");
    assert_eq!(quote_ident("order items"), "`order items`");
}

#[test]
fn test_quote_ident_doubles_embedded_backticks() {
    assert_eq!(quote_ident("weird`name"), "`weird``name`");
}
