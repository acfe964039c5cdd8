//! Application outcome codes carried in the `code` field of every response.
//!
//! # Design
//! The wire code and the enum variant are tied together by a single table,
//! `CODES`. Both directions of the mapping (`decode` and `code`) read from
//! it, so the two can never drift apart. Decoding is total: any integer the
//! table does not know becomes `UnknownException`.

use std::fmt;

/// Outcome of a server-side operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoAccessToOperate,
    Success,
    RegisterSameName,
    RegisterSameEmail,
    TermNotAccepted,
    LoginCredentialsInvalid,
    NeedReLogin,
    UserNotFound,
    EmailTokenNotFound,
    AccountAlreadyVerified,
    AccountNotVerified,
    TokenRequired,
    TokenFormatInvalid,
    TokenExpired,
    TokenSignatureInvalid,
    NoUpdateNeeded,
    PostNotFound,
    PostHidden,
    CommentNotFound,
    TagNotFound,
    FileTooLarge,
    FileFormatInvalid,
    NoFileProvided,
    Unauthorized,
    InvalidParameters,
    UnknownException,
}

const CODES: [(i64, ErrorCode); 26] = [
    (-1, ErrorCode::NoAccessToOperate),
    (0, ErrorCode::Success),
    (10, ErrorCode::RegisterSameName),
    (11, ErrorCode::RegisterSameEmail),
    (12, ErrorCode::TermNotAccepted),
    (21, ErrorCode::LoginCredentialsInvalid),
    (22, ErrorCode::NeedReLogin),
    (30, ErrorCode::UserNotFound),
    (41, ErrorCode::EmailTokenNotFound),
    (42, ErrorCode::AccountAlreadyVerified),
    (43, ErrorCode::AccountNotVerified),
    (50, ErrorCode::TokenRequired),
    (51, ErrorCode::TokenFormatInvalid),
    (52, ErrorCode::TokenExpired),
    (53, ErrorCode::TokenSignatureInvalid),
    (54, ErrorCode::NoUpdateNeeded),
    (60, ErrorCode::PostNotFound),
    (61, ErrorCode::PostHidden),
    (70, ErrorCode::CommentNotFound),
    (80, ErrorCode::TagNotFound),
    (90, ErrorCode::FileTooLarge),
    (91, ErrorCode::FileFormatInvalid),
    (92, ErrorCode::NoFileProvided),
    (401, ErrorCode::Unauthorized),
    (1001, ErrorCode::InvalidParameters),
    (1999, ErrorCode::UnknownException),
];

impl ErrorCode {
    /// Map a wire code to its variant. Unlisted codes decode to
    /// `UnknownException`.
    pub fn decode(code: i64) -> Self {
        CODES
            .iter()
            .find(|(wire, _)| *wire == code)
            .map(|(_, variant)| *variant)
            .unwrap_or(ErrorCode::UnknownException)
    }

    /// The wire code for this variant.
    pub fn code(self) -> i64 {
        CODES
            .iter()
            .find(|(_, variant)| *variant == self)
            .map(|(wire, _)| *wire)
            .unwrap_or(1999)
    }

    pub fn is_success(self) -> bool {
        self == ErrorCode::Success
    }

    fn message(self) -> &'static str {
        match self {
            ErrorCode::NoAccessToOperate => "no access to operate",
            ErrorCode::Success => "success",
            ErrorCode::RegisterSameName => "user name already registered",
            ErrorCode::RegisterSameEmail => "email already registered",
            ErrorCode::TermNotAccepted => "terms not accepted",
            ErrorCode::LoginCredentialsInvalid => "invalid user name or password",
            ErrorCode::NeedReLogin => "login required again",
            ErrorCode::UserNotFound => "user not found",
            ErrorCode::EmailTokenNotFound => "email token not found",
            ErrorCode::AccountAlreadyVerified => "account already verified",
            ErrorCode::AccountNotVerified => "account not verified",
            ErrorCode::TokenRequired => "token required",
            ErrorCode::TokenFormatInvalid => "token format invalid",
            ErrorCode::TokenExpired => "token expired",
            ErrorCode::TokenSignatureInvalid => "token signature invalid",
            ErrorCode::NoUpdateNeeded => "no update needed",
            ErrorCode::PostNotFound => "post not found",
            ErrorCode::PostHidden => "post hidden",
            ErrorCode::CommentNotFound => "comment not found",
            ErrorCode::TagNotFound => "tag not found",
            ErrorCode::FileTooLarge => "file too large",
            ErrorCode::FileFormatInvalid => "file format invalid",
            ErrorCode::NoFileProvided => "no file provided",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::InvalidParameters => "invalid parameters",
            ErrorCode::UnknownException => "unknown exception",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_documented_codes() {
        assert_eq!(ErrorCode::decode(-1), ErrorCode::NoAccessToOperate);
        assert_eq!(ErrorCode::decode(0), ErrorCode::Success);
        assert_eq!(ErrorCode::decode(21), ErrorCode::LoginCredentialsInvalid);
        assert_eq!(ErrorCode::decode(54), ErrorCode::NoUpdateNeeded);
        assert_eq!(ErrorCode::decode(401), ErrorCode::Unauthorized);
        assert_eq!(ErrorCode::decode(1001), ErrorCode::InvalidParameters);
        assert_eq!(ErrorCode::decode(1999), ErrorCode::UnknownException);
    }

    #[test]
    fn decode_is_total() {
        for code in [77, -2, 2, 402, 1000, 2000, i32::MIN as i64, i32::MAX as i64] {
            assert_eq!(ErrorCode::decode(code), ErrorCode::UnknownException, "{code}");
        }
    }

    #[test]
    fn code_inverts_decode() {
        for (wire, variant) in CODES {
            assert_eq!(variant.code(), wire);
            assert_eq!(ErrorCode::decode(wire), variant);
        }
    }

    #[test]
    fn table_has_no_duplicate_codes() {
        for (i, (a, _)) in CODES.iter().enumerate() {
            for (b, _) in &CODES[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn display_includes_wire_code() {
        assert_eq!(ErrorCode::PostNotFound.to_string(), "post not found (60)");
    }
}
