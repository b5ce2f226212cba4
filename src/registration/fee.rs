// Tiered registration fee schedule. More experienced speakers pay less.

/// Fee brackets as (inclusive upper bound on experience years, fee in
/// dollars), checked in order. Experience beyond the last bracket pays
/// nothing.
const FEE_BRACKETS: &[(u32, u32)] = &[(1, 500), (3, 250), (5, 100), (9, 50)];

/// The registration fee for a speaker with the given years of experience.
/// Unset experience is treated as zero and lands in the lowest bracket.
pub fn registration_fee(experience_years: Option<u32>) -> u32 {
    let years = experience_years.unwrap_or(0);
    for &(max_years, fee) in FEE_BRACKETS {
        if years <= max_years {
            return fee;
        }
    }
    0
}
