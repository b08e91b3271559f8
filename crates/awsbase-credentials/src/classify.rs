//! Error classification helpers.
//!
//! Each helper walks the whole [`std::error::Error::source`] chain, so the
//! classified error may be wrapped any number of times by callers.

use std::error::Error as StdError;

use aws_sdk_sts::operation::assume_role::AssumeRoleError;
use aws_sdk_sts::types::error::{
    ExpiredTokenException, MalformedPolicyDocumentException, PackedPolicyTooLargeException,
    RegionDisabledException,
};
use aws_smithy_types::error::ErrorMetadata;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;

use crate::error::Error;

fn chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |&e| e.source())
}

/// Whether `err` is, or wraps, [`Error::NoValidCredentialSources`].
#[must_use]
pub fn is_no_valid_credential_sources_error(err: &(dyn StdError + 'static)) -> bool {
    chain(err).any(|e| {
        matches!(
            e.downcast_ref::<Error>(),
            Some(Error::NoValidCredentialSources { .. })
        )
    })
}

/// Whether `err` is, or wraps, [`Error::CannotAssumeRole`].
#[must_use]
pub fn is_cannot_assume_role_error(err: &(dyn StdError + 'static)) -> bool {
    chain(err).any(|e| matches!(e.downcast_ref::<Error>(), Some(Error::CannotAssumeRole { .. })))
}

/// Whether any AWS API error in the chain of `err` has one of `codes`.
///
/// Matching is exact and case-sensitive. An empty `codes` never matches.
#[must_use]
pub fn err_code_equals(err: &(dyn StdError + 'static), codes: &[&str]) -> bool {
    if codes.is_empty() {
        return false;
    }

    chain(err)
        .filter_map(api_error_code)
        .any(|code| codes.contains(&code))
}

fn api_error_code<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a str> {
    if let Some(meta) = err.downcast_ref::<ErrorMetadata>() {
        return meta.code();
    }
    if let Some(e) = err.downcast_ref::<AssumeRoleError>() {
        return e.code();
    }
    if let Some(e) = err.downcast_ref::<ExpiredTokenException>() {
        return e.code();
    }
    if let Some(e) = err.downcast_ref::<MalformedPolicyDocumentException>() {
        return e.code();
    }
    if let Some(e) = err.downcast_ref::<PackedPolicyTooLargeException>() {
        return e.code();
    }
    if let Some(e) = err.downcast_ref::<RegionDisabledException>() {
        return e.code();
    }
    None
}
