//! The thin collaborator shell that drives [`starkstate_state::StateProcessor`]
//! (SPEC_FULL.md component G). No HTTP client, RPC server, ABI parser, or
//! metrics endpoint lives here - those are out of scope per spec.md §1.
use starkstate_common::{Error, Felt, SequenceNumber, StateDiff};
use starkstate_state::StateProcessor;
use starkstate_storage::Connection;

mod json_source;

pub use json_source::JsonFileSource;

/// Something that can produce ordered `(diff, expected_root, sequence_number)`
/// triples - an L1 log scanner or a feeder-gateway client, in a real
/// deployment. Neither is implemented here; [`JsonFileSource`] is the only
/// concrete source, for local testing and replay.
pub trait StateDiffSource {
    fn next(&mut self) -> anyhow::Result<Option<(StateDiff, Option<Felt>, u64)>>;
}

/// Pulls diffs from `source` one at a time and applies each through
/// [`StateProcessor::apply`], stopping at the first error.
pub fn run(connection: &mut Connection, source: &mut dyn StateDiffSource) -> anyhow::Result<()> {
    while let Some((diff, expected_root, sequence_number)) = source.next()? {
        tracing::info!(%sequence_number, "applying state diff");
        match StateProcessor::apply(connection, &diff, expected_root, SequenceNumber::new(sequence_number)) {
            Ok(root) => {
                tracing::info!(%root, %sequence_number, "state diff applied");
            }
            Err(err @ Error::RootMismatch { .. }) => {
                tracing::error!(%err, "state root mismatch, stopping");
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
