//! Spanish word rendering of monetary amounts ("totalLetras").

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use super::amounts::round2;
use super::error::DteError;

const UNITS: [&str; 20] = [
    "", "UNO", "DOS", "TRES", "CUATRO", "CINCO", "SEIS", "SIETE", "OCHO", "NUEVE", "DIEZ", "ONCE",
    "DOCE", "TRECE", "CATORCE", "QUINCE", "DIECISEIS", "DIECISIETE", "DIECIOCHO", "DIECINUEVE",
];

const TENS: [&str; 10] = [
    "", "", "VEINTE", "TREINTA", "CUARENTA", "CINCUENTA", "SESENTA", "SETENTA", "OCHENTA",
    "NOVENTA",
];

const HUNDREDS: [&str; 10] = [
    "", "CIEN", "DOSCIENTOS", "TRESCIENTOS", "CUATROCIENTOS", "QUINIENTOS", "SEISCIENTOS",
    "SETECIENTOS", "OCHOCIENTOS", "NOVECIENTOS",
];

/// Render an amount as upper-case Spanish words followed by the two-digit
/// cent fraction and the fixed currency suffix, e.g.
/// `"MIL DOSCIENTOS TREINTA Y CUATRO 50/100 DOLARES AMERICANOS"`.
///
/// The integer part must be below 1,000,000; larger or negative amounts fail
/// with [`DteError::Arithmetic`] rather than truncating silently.
pub fn amount_in_words(amount: Decimal) -> Result<String, DteError> {
    if amount.is_sign_negative() {
        return Err(DteError::Arithmetic(format!(
            "cannot render negative amount {amount} in words"
        )));
    }

    let amount = round2(amount);
    let integer = amount.trunc();
    if integer >= dec!(1_000_000) {
        return Err(DteError::Arithmetic(format!(
            "amounts of 1,000,000 or more are not supported ({amount})"
        )));
    }

    // trunc() of a non-negative Decimal below one million always fits in u64.
    let integer = integer.to_u64().ok_or_else(|| {
        DteError::Arithmetic(format!("integer part of {amount} is not representable"))
    })?;
    let cents = (amount.fract() * dec!(100)).to_u64().unwrap_or(0);

    let words = if integer == 0 {
        "CERO".to_string()
    } else {
        number_to_words(integer)
    };

    Ok(format!("{words} {cents:02}/100 DOLARES AMERICANOS"))
}

/// Integer below 1,000,000 to upper-case Spanish words.
/// Tens join their unit with "Y"; "CIENTO" is used whenever a remainder
/// follows the hundred, "CIEN" only for the exact hundred.
fn number_to_words(num: u64) -> String {
    if num < 20 {
        return UNITS[num as usize].to_string();
    }
    if num < 100 {
        let ten = TENS[(num / 10) as usize];
        return match num % 10 {
            0 => ten.to_string(),
            unit => format!("{ten} Y {}", UNITS[unit as usize]),
        };
    }
    if num < 1000 {
        let hundred = (num / 100) as usize;
        return match num % 100 {
            0 => HUNDREDS[hundred].to_string(),
            rest if hundred == 1 => format!("CIENTO {}", number_to_words(rest)),
            rest => format!("{} {}", HUNDREDS[hundred], number_to_words(rest)),
        };
    }
    let thousands = num / 1000;
    let prefix = if thousands > 1 {
        format!("{} MIL", number_to_words(thousands))
    } else {
        "MIL".to_string()
    };
    match num % 1000 {
        0 => prefix,
        rest => format!("{prefix} {}", number_to_words(rest)),
    }
}
