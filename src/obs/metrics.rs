// self
use crate::obs::{FlowKind, FlowOutcome};

/// Counter incremented once per flow attempt and once per terminal outcome.
pub const FLOW_COUNTER: &str = "oauth2_wegene_flow_total";

/// Records a flow outcome via the global metrics recorder (when enabled).
///
/// Every sample carries the `strategy`, `flow` and `outcome` labels.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			FLOW_COUNTER,
			"strategy" => crate::provider::wegene::STRATEGY_NAME,
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}
