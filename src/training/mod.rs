pub mod symnmf_optimiser;

use faer::Mat;

////////////
// States //
////////////

/// Where the factorisation loop stands
///
/// Transitions: `Initialised -> Iterating` on the first update,
/// `Iterating -> Iterating` while the change between iterates stays at or
/// above the tolerance, and then either `Iterating -> Converged` or
/// `Iterating -> MaxIterReached`. Both terminal states carry a usable H;
/// hitting the iteration cap is not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FactorState {
    /// No update applied yet
    Initialised,
    /// At least one update applied, stopping criterion not met yet
    Iterating,
    /// Squared Frobenius change between iterates fell below the tolerance
    Converged,
    /// The iteration cap was reached first
    MaxIterReached,
}

impl FactorState {
    /// Returns boolean if the loop has stopped
    pub fn is_terminal(&self) -> bool {
        matches!(self, FactorState::Converged | FactorState::MaxIterReached)
    }
}

impl std::fmt::Display for FactorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FactorState::Initialised => "initialised",
            FactorState::Iterating => "iterating",
            FactorState::Converged => "converged",
            FactorState::MaxIterReached => "max iterations reached",
        };
        write!(f, "{}", s)
    }
}

/////////////
// Results //
/////////////

/// Output of the factorisation
///
/// ### Fields
///
/// * `h` - The optimised non-negative factor matrix (n x k)
/// * `state` - Final state of the loop
/// * `n_iter` - Number of multiplicative updates applied
/// * `delta` - Squared Frobenius distance between the last two iterates;
///   infinite if no update was applied
/// * `loss` - `||Wn - H H^T||_F^2` for the returned H
#[derive(Clone, Debug)]
pub struct FactorisationResult<T> {
    pub h: Mat<T>,
    pub state: FactorState,
    pub n_iter: usize,
    pub delta: T,
    pub loss: T,
}
