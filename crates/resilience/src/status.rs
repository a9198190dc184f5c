// crates/resilience/src/status.rs
//! HTTP status classification shared by the pipeline layers
//!
//! Codes are plain `u16` so this crate stays independent of any HTTP client.

/// Statuses that indicate a problem with the request itself.
///
/// These never open a circuit and are never retried.
pub const CLIENT_ERRORS: &[u16] = &[
    400, 401, 402, 403, 404, 405, 406, 407, 408, 409, 410, 411, 412, 413, 414, 415, 416, 417, 418,
    421, 422, 423, 424, 426, 428, 431, 444, 451, 499,
];

/// Statuses worth retrying after a short wait
pub const TRANSIENT_ERRORS: &[u16] = &[408, 502, 503, 504];

/// Returns true for any 2xx status
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Returns true if the status is in the fixed client-error set
pub fn is_client_error(status: u16) -> bool {
    CLIENT_ERRORS.contains(&status)
}

/// Returns true if the status is in the transient set
pub fn is_transient(status: u16) -> bool {
    TRANSIENT_ERRORS.contains(&status)
}

/// Returns true if a response with this status should open the circuit
///
/// Anything that is neither a success nor a known client error counts,
/// including unassigned 4xx codes such as 420 or 429.
pub fn opens_circuit(status: u16) -> bool {
    !is_success(status) && !is_client_error(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(is_success(200));
        assert!(is_success(204));
        assert!(!is_success(199));
        assert!(!is_success(300));
    }

    #[test]
    fn test_client_error_set() {
        for status in [400, 401, 403, 404, 409, 418, 422, 451, 499] {
            assert!(is_client_error(status), "{} should be a client error", status);
        }
        for status in [419, 420, 425, 429, 500, 503] {
            assert!(!is_client_error(status), "{} should not be a client error", status);
        }
    }

    #[test]
    fn test_transient_set() {
        for status in [408, 502, 503, 504] {
            assert!(is_transient(status));
        }
        assert!(!is_transient(500));
        assert!(!is_transient(404));
    }

    #[test]
    fn test_opens_circuit() {
        assert!(opens_circuit(500));
        assert!(opens_circuit(503));
        assert!(opens_circuit(429));
        assert!(opens_circuit(302));
        assert!(!opens_circuit(200));
        assert!(!opens_circuit(404));
        // 408 is both transient and a client error; it never trips the breaker
        assert!(!opens_circuit(408));
    }
}
