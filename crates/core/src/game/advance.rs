//! Bounded turn loop and stop-reason handling.
//! This module exists to drive the scheduler until input is needed or a budget runs out.
//! It does not own queue ordering, command legality, or entity decisions.

use super::*;

impl Game {
    /// Runs up to `max_turns` entity turns.
    ///
    /// Stops early when the player has nothing to do, a delayed reaction asks
    /// to yield, the player dies, or no entity can ever act again. A player
    /// that stopped the loop is asked first on the next call.
    pub fn advance(&mut self, max_turns: u32) -> AdvanceResult {
        let mut turns_taken = 0;
        if let Some(outcome) = self.outcome {
            return AdvanceResult { turns_taken, stop_reason: StopReason::Finished(outcome) };
        }

        loop {
            if turns_taken >= max_turns {
                return AdvanceResult { turns_taken, stop_reason: StopReason::BudgetExhausted };
            }

            let current = match self.waiting_on.take() {
                Some(id) if self.entities.contains_key(id) => id,
                _ => {
                    if self.scheduler.queued_count() == 0 && !self.refill_turn_queue() {
                        return AdvanceResult { turns_taken, stop_reason: StopReason::Stalled };
                    }
                    let Some(id) = self.next_ready() else {
                        continue;
                    };
                    id
                }
            };

            let command = self.act(current);
            if !self.execute_command(current, command) {
                self.waiting_on = Some(current);
                return AdvanceResult { turns_taken, stop_reason: StopReason::AwaitingInput };
            }
            turns_taken += 1;
            self.turn += 1;

            if let Some(outcome) = self.outcome {
                return AdvanceResult { turns_taken, stop_reason: StopReason::Finished(outcome) };
            }
            if self.take_halt() {
                return AdvanceResult { turns_taken, stop_reason: StopReason::Halted };
            }
        }
    }
}
