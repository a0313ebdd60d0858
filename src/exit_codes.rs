//! Exit code constants for the claimchain CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid input, bad config)
//! - 2: Claim blocked by another agent's chain
//! - 3: Store failure (unreadable document, filesystem error)
//! - 4: Lock acquisition timed out

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid input, or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// The claim overlaps a live chain owned by a different agent.
pub const BLOCKED: i32 = 2;

/// The shared document could not be read or written.
pub const STORE_FAILURE: i32 = 3;

/// The store lock could not be acquired within the timeout.
pub const LOCK_FAILURE: i32 = 4;
