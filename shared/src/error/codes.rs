//! Unified error codes for the Bazaar marketplace
//!
//! This module defines all error codes used across the server and frontend.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Wallet/payment errors
//! - 6xxx: Product/inventory errors
//! - 7xxx: Return errors
//! - 8xxx: Review errors
//! - 9xxx: System errors

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Account is disabled
    AccountDisabled = 1002,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Illegal order state transition
    InvalidStateTransition = 4002,
    /// Order contains no items
    EmptyOrder = 4003,
    /// Item quantity out of range
    InvalidQuantity = 4004,
    /// Command already processed
    DuplicateCommand = 4005,

    // ==================== 5xxx: Wallet / Payment ====================
    /// Wallet balance too low for the requested debit
    InsufficientFunds = 5001,
    /// Account not found
    AccountNotFound = 5002,
    /// Monetary amount invalid
    InvalidAmount = 5003,
    /// Payout was already approved for this order
    PayoutAlreadyApproved = 5004,

    // ==================== 6xxx: Product / Inventory ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product is not on sale
    ProductUnavailable = 6002,
    /// Not enough stock to satisfy a reservation
    InsufficientStock = 6003,

    // ==================== 7xxx: Returns ====================
    /// Return request not found
    ReturnNotFound = 7001,
    /// Order item is not eligible for return
    ReturnNotEligible = 7002,
    /// An active return already exists for this order item
    DuplicateActiveReturn = 7003,
    /// Return request already reached a terminal state
    ReturnAlreadyResolved = 7004,

    // ==================== 8xxx: Reviews ====================
    /// Rating outside the 1-5 range
    InvalidRating = 8001,
    /// A review by this author role already exists for the order item
    DuplicateReview = 8002,
    /// Order item is not eligible for review
    ReviewNotEligible = 8003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Storage is full
    StorageFull = 9401,
    /// Out of memory
    OutOfMemory = 9402,
    /// Storage is corrupted
    StorageCorrupted = 9403,
    /// System is busy, caller should retry
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field missing",
            Self::ValueOutOfRange => "Value out of range",

            Self::NotAuthenticated => "Caller is not authenticated",
            Self::AccountDisabled => "Account is disabled",

            Self::PermissionDenied => "Permission denied",
            Self::RoleRequired => "Role required",
            Self::AdminRequired => "Admin role required",

            Self::OrderNotFound => "Order not found",
            Self::InvalidStateTransition => "Invalid order state transition",
            Self::EmptyOrder => "Order contains no items",
            Self::InvalidQuantity => "Invalid quantity",
            Self::DuplicateCommand => "Command already processed",

            Self::InsufficientFunds => "Insufficient funds",
            Self::AccountNotFound => "Account not found",
            Self::InvalidAmount => "Invalid amount",
            Self::PayoutAlreadyApproved => "Payout already approved",

            Self::ProductNotFound => "Product not found",
            Self::ProductUnavailable => "Product is not on sale",
            Self::InsufficientStock => "Insufficient stock",

            Self::ReturnNotFound => "Return request not found",
            Self::ReturnNotEligible => "Order item is not eligible for return",
            Self::DuplicateActiveReturn => "An active return already exists for this order item",
            Self::ReturnAlreadyResolved => "Return request already resolved",

            Self::InvalidRating => "Rating must be between 1 and 5",
            Self::DuplicateReview => "A review already exists for this order item",
            Self::ReviewNotEligible => "Order item is not eligible for review",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::StorageFull => "Storage is full",
            Self::OutOfMemory => "Out of memory",
            Self::StorageCorrupted => "Storage is corrupted",
            Self::SystemBusy => "System is busy, please retry",
        }
    }

    /// Get the HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::EmptyOrder
            | Self::InvalidQuantity
            | Self::InvalidAmount
            | Self::InvalidRating => StatusCode::BAD_REQUEST,

            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,

            Self::AccountDisabled
            | Self::PermissionDenied
            | Self::RoleRequired
            | Self::AdminRequired => StatusCode::FORBIDDEN,

            Self::NotFound
            | Self::OrderNotFound
            | Self::AccountNotFound
            | Self::ProductNotFound
            | Self::ReturnNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists
            | Self::DuplicateCommand
            | Self::DuplicateActiveReturn
            | Self::DuplicateReview => StatusCode::CONFLICT,

            Self::InvalidStateTransition
            | Self::InsufficientFunds
            | Self::PayoutAlreadyApproved
            | Self::ProductUnavailable
            | Self::InsufficientStock
            | Self::ReturnNotEligible
            | Self::ReturnAlreadyResolved
            | Self::ReviewNotEligible => StatusCode::UNPROCESSABLE_ENTITY,

            Self::SystemBusy | Self::StorageFull | Self::OutOfMemory => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::StorageCorrupted => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 value to [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidFormat,
            7 => Self::RequiredField,
            8 => Self::ValueOutOfRange,

            1001 => Self::NotAuthenticated,
            1002 => Self::AccountDisabled,

            2001 => Self::PermissionDenied,
            2002 => Self::RoleRequired,
            2003 => Self::AdminRequired,

            4001 => Self::OrderNotFound,
            4002 => Self::InvalidStateTransition,
            4003 => Self::EmptyOrder,
            4004 => Self::InvalidQuantity,
            4005 => Self::DuplicateCommand,

            5001 => Self::InsufficientFunds,
            5002 => Self::AccountNotFound,
            5003 => Self::InvalidAmount,
            5004 => Self::PayoutAlreadyApproved,

            6001 => Self::ProductNotFound,
            6002 => Self::ProductUnavailable,
            6003 => Self::InsufficientStock,

            7001 => Self::ReturnNotFound,
            7002 => Self::ReturnNotEligible,
            7003 => Self::DuplicateActiveReturn,
            7004 => Self::ReturnAlreadyResolved,

            8001 => Self::InvalidRating,
            8002 => Self::DuplicateReview,
            8003 => Self::ReviewNotEligible,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9401 => Self::StorageFull,
            9402 => Self::OutOfMemory,
            9403 => Self::StorageCorrupted,
            9404 => Self::SystemBusy,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
