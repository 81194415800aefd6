use crate::core::chain::ChainSelection;
use crate::core::valuation::Valuation;

/// What is currently on screen. Only the address and chain outlive the
/// process, through the state store.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub address: Option<String>,
    pub chain: ChainSelection,
    pub native_price: Option<f64>,
    pub valuation: Option<Valuation>,
    /// Address and chain key the current `valuation` was fetched for.
    pub loaded_for: Option<(String, String)>,
    next_load: u64,
    applied_load: u64,
}

impl ViewState {
    pub fn new(chain: ChainSelection) -> Self {
        Self {
            address: None,
            chain,
            native_price: None,
            valuation: None,
            loaded_for: None,
            next_load: 0,
            applied_load: 0,
        }
    }

    /// Hands out the sequence number for a new load.
    pub fn begin_load(&mut self) -> u64 {
        self.next_load += 1;
        self.next_load
    }

    /// A load is stale once a newer one has already been applied.
    pub fn is_superseded(&self, seq: u64) -> bool {
        seq < self.applied_load
    }

    /// Whether results of load `seq` may replace the current view.
    pub fn try_apply(&mut self, seq: u64) -> bool {
        if self.is_superseded(seq) {
            return false;
        }
        self.applied_load = seq;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chain::ChainInfo;

    fn state() -> ViewState {
        let (chain, _) = ChainSelection::initial(ChainInfo::defaults(), None, None, "eth-mainnet");
        ViewState::new(chain)
    }

    #[test]
    fn test_later_completion_wins() {
        let mut state = state();
        let first = state.begin_load();
        let second = state.begin_load();

        assert!(!state.is_superseded(first));
        assert!(state.try_apply(second));
        assert!(state.is_superseded(first));
        assert!(!state.try_apply(first));
    }

    #[test]
    fn test_in_order_completion_applies_both() {
        let mut state = state();
        let first = state.begin_load();
        let second = state.begin_load();

        assert!(state.try_apply(first));
        assert!(state.try_apply(second));
    }
}
