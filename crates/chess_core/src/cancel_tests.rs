use super::*;
use std::thread;

#[test]
fn test_new_token_is_live() {
    let token = CancelToken::new();
    assert!(!token.is_cancelled());
}

#[test]
fn test_clones_share_the_flag() {
    let token = CancelToken::new();
    let handle = token.clone();
    assert!(handle.same_as(&token));
    token.cancel();
    assert!(handle.is_cancelled());
}

#[test]
fn test_cancel_across_threads() {
    let token = CancelToken::new();
    let handle = token.clone();
    thread::spawn(move || handle.cancel()).join().unwrap();
    assert!(token.is_cancelled());
}

#[test]
fn test_independent_tokens() {
    let a = CancelToken::new();
    let b = CancelToken::new();
    a.cancel();
    assert!(!b.is_cancelled());
    assert!(!a.same_as(&b));
}
