//! UART baud rate arithmetic

use ba45_hal::uart::BaudPrescaler;

/// Baud rate generator divisor for `baudrate`
///
/// `divisor = round(clock_hz / (prescaler · baudrate)) - 1`
///
/// Returns `None` when the rate is zero or the divisor does not fit the
/// 8-bit register.
pub fn baud_divisor(clock_hz: u32, prescaler: BaudPrescaler, baudrate: u32) -> Option<u8> {
    if baudrate == 0 {
        return None;
    }

    let denominator = prescaler.factor() as u64 * baudrate as u64;
    let quotient = (clock_hz as u64 + denominator / 2) / denominator;

    quotient
        .checked_sub(1)
        .and_then(|divisor| u8::try_from(divisor).ok())
}

/// Baud rate actually produced by `divisor`
pub fn actual_baudrate(clock_hz: u32, prescaler: BaudPrescaler, divisor: u8) -> u32 {
    clock_hz / (prescaler.factor() * (divisor as u32 + 1))
}
