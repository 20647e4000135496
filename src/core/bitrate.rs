//! Bitrate calculation for size-targeted compression
//!
//! Converts a target output size and a track duration into the constant
//! bitrate that makes `bitrate * duration` land on the target.

/// One megabyte as entered by the user (binary, 1024 * 1024 bytes)
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Lowest bitrate libmp3lame accepts (kbps)
pub const LAME_MIN_BITRATE: u32 = 8;

/// Highest bitrate libmp3lame accepts (kbps)
pub const LAME_MAX_BITRATE: u32 = 320;

/// Calculate the bitrate (kbps) needed to hit `target_size_mb` for a track
/// lasting `duration_secs`.
///
/// bitrate (kbps) = ceil(size_bytes * 8 / duration_seconds / 1000)
///
/// Rounding up keeps the encoder from undershooting by a fraction of a kbps.
pub fn calculate_bitrate(target_size_mb: f64, duration_secs: f64) -> Result<u32, String> {
    if !target_size_mb.is_finite() || target_size_mb <= 0.0 {
        return Err(format!("Invalid target size: {}", target_size_mb));
    }
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(format!("Invalid audio duration: {}", duration_secs));
    }

    let target_bytes = target_size_mb * BYTES_PER_MB;
    let bitrate_bps = (target_bytes * 8.0) / duration_secs;
    let bitrate_kbps = (bitrate_bps / 1000.0).ceil();

    if bitrate_kbps > u32::MAX as f64 {
        return Err(format!("Bitrate out of range: {} kbps", bitrate_kbps));
    }

    Ok(bitrate_kbps as u32)
}

/// Format a bitrate for ffmpeg's `-b:a` argument (e.g. "192k")
pub fn bitrate_arg(bitrate_kbps: u32) -> String {
    format!("{}k", bitrate_kbps)
}

/// Estimated output size in bytes for a bitrate and duration
pub fn estimate_output_bytes(bitrate_kbps: u32, duration_secs: f64) -> u64 {
    if duration_secs <= 0.0 {
        return 0;
    }
    (bitrate_kbps as f64 * 1000.0 * duration_secs / 8.0) as u64
}

/// Whether libmp3lame will honour this bitrate as-is
pub fn is_within_encoder_range(bitrate_kbps: u32) -> bool {
    (LAME_MIN_BITRATE..=LAME_MAX_BITRATE).contains(&bitrate_kbps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_megabyte_over_eight_seconds() {
        // 8388608 bits / 8 s = 1048576 bps
        let bitrate = calculate_bitrate(1.0, 8.0).unwrap();
        assert_eq!(bitrate, 1049);
    }

    #[test]
    fn test_rounds_up() {
        // 5 MB over 4 minutes: 41943040 bits / 240 s = 174762.67 bps
        let bitrate = calculate_bitrate(5.0, 240.0).unwrap();
        assert_eq!(bitrate, 175);
    }

    #[test]
    fn test_fractional_target() {
        // 2.5 MB over 180 s: 20971520 bits / 180 = 116508.44 bps
        let bitrate = calculate_bitrate(2.5, 180.0).unwrap();
        assert_eq!(bitrate, 117);
    }

    #[test]
    fn test_rejects_zero_duration() {
        assert!(calculate_bitrate(5.0, 0.0).is_err());
        assert!(calculate_bitrate(5.0, -1.0).is_err());
        assert!(calculate_bitrate(5.0, f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_non_positive_target() {
        assert!(calculate_bitrate(0.0, 60.0).is_err());
        assert!(calculate_bitrate(-2.0, 60.0).is_err());
        assert!(calculate_bitrate(f64::INFINITY, 60.0).is_err());
    }

    #[test]
    fn test_bitrate_arg() {
        assert_eq!(bitrate_arg(128), "128k");
    }

    #[test]
    fn test_estimate_is_close_to_target() {
        let duration = 213.7;
        let bitrate = calculate_bitrate(3.0, duration).unwrap();
        let estimate = estimate_output_bytes(bitrate, duration);
        let target = (3.0 * BYTES_PER_MB) as u64;

        // Rounding up overshoots by at most 1 kbps worth of audio
        assert!(estimate >= target);
        assert!(estimate - target <= (1000.0 * duration / 8.0) as u64 + 1);
    }

    #[test]
    fn test_estimate_zero_duration() {
        assert_eq!(estimate_output_bytes(192, 0.0), 0);
    }

    #[test]
    fn test_encoder_range() {
        assert!(is_within_encoder_range(8));
        assert!(is_within_encoder_range(320));
        assert!(!is_within_encoder_range(7));
        assert!(!is_within_encoder_range(321));
    }
}
