use num_bigint::{BigInt, Sign};
use num_traits::{One, ToPrimitive, Zero};
use thiserror::Error;

/// Widest usable field: decoded counters are `u64` and the top bit of
/// each field is overflow headroom.
pub const MAX_BITS_PER_CHOICE: usize = 64;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncodingError {
    #[error("at least two choices are required, got {0}")]
    TooFewChoices(usize),
    #[error("bits per choice must be in [2, {MAX_BITS_PER_CHOICE}], got {0}")]
    InvalidBitsPerChoice(usize),
    #[error("choice index {choice} out of range for {num_choices} choices")]
    ChoiceOutOfRange { choice: usize, num_choices: usize },
    #[error("bin index {bin} out of range for {num_bins} bins")]
    BinOutOfRange { bin: usize, num_bins: usize },
    #[error("encoded value must be non-negative")]
    NegativeValue,
}

fn validate_dimensions(num_choices: usize, bits_per_choice: usize) -> Result<(), EncodingError> {
    if num_choices < 2 {
        return Err(EncodingError::TooFewChoices(num_choices));
    }
    if !(2..=MAX_BITS_PER_CHOICE).contains(&bits_per_choice) {
        return Err(EncodingError::InvalidBitsPerChoice(bits_per_choice));
    }
    Ok(())
}

/// Encode one choice as `1 << B·(bin·C + choice)`.
///
/// Summing such encodings (plain, or homomorphically under encryption)
/// accumulates one counter per choice, `B` bits wide. `num_bins = 0`
/// means ungrouped; `bin` is only range-checked when bins are in play.
pub fn encode_single(
    choice: usize,
    num_choices: usize,
    bits_per_choice: usize,
    bin: usize,
    num_bins: usize,
) -> Result<BigInt, EncodingError> {
    validate_dimensions(num_choices, bits_per_choice)?;
    if choice >= num_choices {
        return Err(EncodingError::ChoiceOutOfRange {
            choice,
            num_choices,
        });
    }
    if num_bins > 0 && bin >= num_bins {
        return Err(EncodingError::BinOutOfRange { bin, num_bins });
    }
    let offset = bits_per_choice * (bin * num_choices + choice);
    Ok(BigInt::one() << offset)
}

/// Sum of the single-choice encodings. Repeated choices accumulate.
pub fn encode_multiple(
    choices: &[usize],
    num_choices: usize,
    bits_per_choice: usize,
    bin: usize,
    num_bins: usize,
) -> Result<BigInt, EncodingError> {
    let mut total = BigInt::zero();
    for &choice in choices {
        total += encode_single(choice, num_choices, bits_per_choice, bin, num_bins)?;
    }
    Ok(total)
}

/// Extract the per-choice counters from an accumulated encoding.
///
/// Each field is masked with `2^{B−1} − 1`, one bit short of its width:
/// the top bit is reserved headroom, so a tally that reaches `2^{B−1}`
/// is ambiguous and the caller must pick a larger `B`.
pub fn decode(
    x: &BigInt,
    num_choices: usize,
    bits_per_choice: usize,
) -> Result<Vec<u64>, EncodingError> {
    decode_bin(x, num_choices, bits_per_choice, 0)
}

/// Per-bin decode: counters for every bin in `[0, num_bins)`.
pub fn decode_groups(
    x: &BigInt,
    num_choices: usize,
    bits_per_choice: usize,
    num_bins: usize,
) -> Result<Vec<Vec<u64>>, EncodingError> {
    (0..num_bins.max(1))
        .map(|bin| decode_bin(x, num_choices, bits_per_choice, bin))
        .collect()
}

fn decode_bin(
    x: &BigInt,
    num_choices: usize,
    bits_per_choice: usize,
    bin: usize,
) -> Result<Vec<u64>, EncodingError> {
    validate_dimensions(num_choices, bits_per_choice)?;
    if x.sign() == Sign::Minus {
        return Err(EncodingError::NegativeValue);
    }
    let mask = (BigInt::one() << (bits_per_choice - 1)) - BigInt::one();
    let mut counters = Vec::with_capacity(num_choices);
    for choice in 0..num_choices {
        let offset = bits_per_choice * (bin * num_choices + choice);
        let field = (x >> offset) & &mask;
        // The mask keeps the field under 64 bits.
        counters.push(field.to_u64().unwrap());
    }
    Ok(counters)
}

/// Total width of the encoding in bits; zero when any dimension is zero.
/// The application must keep this within the key's modulus bit length.
pub fn total_bits(num_choices: usize, num_bins: usize, bits_per_choice: usize) -> usize {
    if num_choices == 0 || bits_per_choice == 0 {
        return 0;
    }
    num_choices * num_bins.max(1) * bits_per_choice
}

/// Every single-choice encoding across all bins, in bin-major order.
/// This is the valid set handed to the membership prover.
pub fn single_choice_permutations(
    num_choices: usize,
    bits_per_choice: usize,
    num_bins: usize,
) -> Result<Vec<BigInt>, EncodingError> {
    let mut permutations = Vec::with_capacity(num_choices * num_bins.max(1));
    for bin in 0..num_bins.max(1) {
        for choice in 0..num_choices {
            permutations.push(encode_single(
                choice,
                num_choices,
                bits_per_choice,
                bin,
                num_bins,
            )?);
        }
    }
    Ok(permutations)
}
