//! FlightSureData - the ledger facade
//!
//! Every public operation takes the caller identity first and runs as one
//! critical section over [`LedgerState`]: guards, reads, and writes happen
//! under a single lock, and an `Err` leaves the state exactly as it was.
//! Withdrawal is the one operation that releases the lock mid-way, after
//! the balance is zeroed and before the payout rail is called.

use std::sync::Arc;

use flightsure_common::{
    AccountId, Airline, Flight, FlightKey, InsurancePolicy, LedgerError, PolicyKey, Result,
};
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

use crate::config::LedgerConfig;
use crate::events::{EventBus, EventRecord, LedgerEvent};
use crate::ledger::{FundsTransfer, PayoutLog};
use crate::snapshot::LedgerSnapshot;
use crate::state::LedgerState;

type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Point-in-time view of ledger totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Airline records, blank ones included
    pub airlines: usize,
    pub registered_airlines: usize,
    pub flights: usize,
    /// Policy keys still holding uncredited policies
    pub open_policy_keys: usize,
    pub outstanding_credit: u128,
    pub reserve: u64,
    pub total_deposited: u128,
    pub total_paid_out: u128,
    pub authorized_callers: usize,
    pub event_subscribers: usize,
}

/// Authoritative flight-insurance ledger
pub struct FlightSureData {
    config: LedgerConfig,
    state: Mutex<LedgerState>,
    events: EventBus,
    payouts: Arc<dyn FundsTransfer>,
}

impl FlightSureData {
    /// Create a ledger owned (and authorized) by `owner`
    pub fn new(owner: AccountId, config: LedgerConfig) -> Self {
        info!(owner = %owner, vote_counting = ?config.vote_counting, "FlightSure ledger created");
        let state = LedgerState::new(owner, config.start_operational);
        Self::from_state(state, config)
    }

    /// Rebuild a ledger from a snapshot
    pub fn restore(snapshot: LedgerSnapshot, config: LedgerConfig) -> Result<Self> {
        let taken_at = snapshot.taken_at;
        let state = snapshot.into_state()?;
        info!(owner = %state.access.owner(), taken_at = taken_at, "FlightSure ledger restored");
        Ok(Self::from_state(state, config))
    }

    fn from_state(state: LedgerState, config: LedgerConfig) -> Self {
        Self {
            events: EventBus::new(config.event_capacity),
            config,
            state: Mutex::new(state),
            payouts: Arc::new(PayoutLog::new()),
        }
    }

    /// Set the payout rail used by withdrawals
    pub fn with_funds_transfer(mut self, payouts: Arc<dyn FundsTransfer>) -> Self {
        self.payouts = payouts;
        self
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Subscribe to ledger events
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.events.subscribe()
    }

    /// Lock and pass the authorization and gate checks
    fn enter(&self, caller: &AccountId) -> LedgerResult<MutexGuard<'_, LedgerState>> {
        let state = self.state.lock();
        state.require_gated(caller)?;
        Ok(state)
    }

    /// Lock and pass the owner check
    fn enter_as_owner(
        &self,
        caller: &AccountId,
    ) -> LedgerResult<MutexGuard<'_, LedgerState>> {
        let state = self.state.lock();
        state.access.require_owner(caller)?;
        Ok(state)
    }

    // ============ OPERATIONAL GATE ============

    /// Read the gate. Requires authorization but not an open gate.
    pub fn is_operational(&self, caller: &AccountId) -> LedgerResult<bool> {
        let state = self.state.lock();
        state.access.require_authorized(caller)?;
        Ok(state.gate.is_open())
    }

    /// Owner-only; succeeds whatever the current gate value
    #[instrument(skip(self))]
    pub fn set_operating_status(
        &self,
        caller: &AccountId,
        operational: bool,
    ) -> LedgerResult<()> {
        let mut state = self.enter_as_owner(caller)?;
        state.gate.set(operational);

        info!(operational = operational, "Operating status set");
        self.events
            .publish(LedgerEvent::OperatingStatusChanged { operational });
        Ok(())
    }

    // ============ AUTHORIZATION ============

    #[instrument(skip(self))]
    pub fn authorize_caller(
        &self,
        caller: &AccountId,
        id: &AccountId,
    ) -> LedgerResult<()> {
        let mut state = self.enter_as_owner(caller)?;
        state.access.authorize(*id);
        info!(id = %id, "Caller authorized");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn deauthorize_caller(
        &self,
        caller: &AccountId,
        id: &AccountId,
    ) -> LedgerResult<()> {
        let mut state = self.enter_as_owner(caller)?;
        state.access.deauthorize(*id);
        info!(id = %id, "Caller deauthorized");
        Ok(())
    }

    pub fn is_authorized(
        &self,
        caller: &AccountId,
        id: &AccountId,
    ) -> LedgerResult<bool> {
        Ok(self.enter(caller)?.access.is_authorized(id))
    }

    pub fn owner(&self) -> AccountId {
        self.state.lock().access.owner()
    }

    // ============ AIRLINES ============

    /// Add a pending airline and announce it.
    ///
    /// Re-adding renames the airline and clears its funding flag; its
    /// registration and votes are kept.
    #[instrument(skip(self))]
    pub fn add_airline(
        &self,
        caller: &AccountId,
        airline: &AccountId,
        name: &str,
    ) -> LedgerResult<()> {
        let mut state = self.enter(caller)?;
        if state.airlines.add(*airline, name).is_some() {
            warn!(airline = %airline, "Existing airline record re-added");
        }

        info!(airline = %airline, name = name, "Airline added");
        self.events.publish(LedgerEvent::AirlineAdded {
            airline: *airline,
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn has_airline_been_added(
        &self,
        caller: &AccountId,
        airline: &AccountId,
    ) -> LedgerResult<bool> {
        Ok(self.enter(caller)?.airlines.exists(airline))
    }

    /// Finalize registration. The vote threshold is the caller's call.
    #[instrument(skip(self))]
    pub fn add_to_registered_airlines(
        &self,
        caller: &AccountId,
        airline: &AccountId,
    ) -> LedgerResult<()> {
        let mut state = self.enter(caller)?;
        if state
            .airlines
            .finalize(airline, self.config.unknown_airlines)?
        {
            info!(airline = %airline, "Airline registered");
            self.events
                .publish(LedgerEvent::AirlineRegistered { airline: *airline });
        } else {
            debug!(airline = %airline, "Airline already registered");
        }
        Ok(())
    }

    pub fn has_airline_been_registered(
        &self,
        caller: &AccountId,
        airline: &AccountId,
    ) -> LedgerResult<bool> {
        Ok(self.enter(caller)?.airlines.is_registered(airline))
    }

    /// Registered airlines in finalization order
    pub fn registered_airlines(
        &self,
        caller: &AccountId,
    ) -> LedgerResult<Vec<AccountId>> {
        Ok(self.enter(caller)?.airlines.registered().to_vec())
    }

    pub fn airline(
        &self,
        caller: &AccountId,
        airline: &AccountId,
    ) -> LedgerResult<Option<Airline>> {
        Ok(self.enter(caller)?.airlines.get(airline).cloned())
    }

    pub fn registration_votes(
        &self,
        caller: &AccountId,
        airline: &AccountId,
    ) -> LedgerResult<u64> {
        Ok(self.enter(caller)?.airlines.votes_for(airline))
    }

    pub fn has_airline_voted_for(
        &self,
        caller: &AccountId,
        voter: &AccountId,
        votee: &AccountId,
    ) -> LedgerResult<bool> {
        Ok(self.enter(caller)?.airlines.has_voted(voter, votee))
    }

    /// Record a vote; returns the votee's updated count
    #[instrument(skip(self))]
    pub fn vote_for_airline(
        &self,
        caller: &AccountId,
        voter: &AccountId,
        votee: &AccountId,
    ) -> LedgerResult<u64> {
        let mut state = self.enter(caller)?;
        let votes = state
            .airlines
            .vote(
                voter,
                votee,
                self.config.vote_counting,
                self.config.unknown_airlines,
            )?;

        info!(voter = %voter, votee = %votee, votes = votes, "Vote recorded");
        self.events.publish(LedgerEvent::VoteRecorded {
            voter: *voter,
            votee: *votee,
            votes,
        });
        Ok(votes)
    }

    #[instrument(skip(self))]
    pub fn set_funding_submitted(
        &self,
        caller: &AccountId,
        airline: &AccountId,
    ) -> LedgerResult<()> {
        let mut state = self.enter(caller)?;
        if state
            .airlines
            .set_funding_submitted(airline, self.config.unknown_airlines)?
        {
            info!(airline = %airline, "Funding submitted");
        }
        Ok(())
    }

    pub fn has_funding_been_submitted(
        &self,
        caller: &AccountId,
        airline: &AccountId,
    ) -> LedgerResult<bool> {
        Ok(self.enter(caller)?.airlines.is_funded(airline))
    }

    // ============ FLIGHTS ============

    /// Write a flight record; identical (airline, code, timestamp) overwrites
    #[instrument(skip(self))]
    pub fn add_to_registered_flights(
        &self,
        caller: &AccountId,
        airline: &AccountId,
        flight_code: &str,
        timestamp: u64,
    ) -> LedgerResult<()> {
        let mut state = self.enter(caller)?;
        let key = FlightKey::new(*airline, flight_code, timestamp);
        let replaced = state.flights.register(&key);

        info!(
            airline = %airline,
            flight = flight_code,
            timestamp = timestamp,
            replaced = replaced,
            "Flight registered"
        );
        Ok(())
    }

    pub fn flight(
        &self,
        caller: &AccountId,
        airline: &AccountId,
        flight_code: &str,
        timestamp: u64,
    ) -> LedgerResult<Option<Flight>> {
        let key = FlightKey::new(*airline, flight_code, timestamp);
        Ok(self.enter(caller)?.flights.get(&key).cloned())
    }

    pub fn is_flight_registered(
        &self,
        caller: &AccountId,
        airline: &AccountId,
        flight_code: &str,
        timestamp: u64,
    ) -> LedgerResult<bool> {
        let key = FlightKey::new(*airline, flight_code, timestamp);
        Ok(self.enter(caller)?.flights.is_registered(&key))
    }

    // ============ POLICIES & CREDITS ============

    #[instrument(skip(self))]
    pub fn add_to_insurance_policy(
        &self,
        caller: &AccountId,
        airline: &AccountId,
        flight_code: &str,
        insuree: &AccountId,
        amount: u64,
    ) -> LedgerResult<()> {
        let mut state = self.enter(caller)?;
        let key = PolicyKey::new(*airline, flight_code);
        let count = state.policies.purchase(&key, *insuree, amount);

        info!(
            airline = %airline,
            flight = flight_code,
            insuree = %insuree,
            amount = amount,
            policies = count,
            "Policy added"
        );
        Ok(())
    }

    /// Policies under (airline, flight code), in insertion order
    pub fn policies(
        &self,
        caller: &AccountId,
        airline: &AccountId,
        flight_code: &str,
    ) -> LedgerResult<Vec<InsurancePolicy>> {
        let key = PolicyKey::new(*airline, flight_code);
        Ok(self.enter(caller)?.policies.policies(&key).to_vec())
    }

    /// Credit every policy under (airline, flight code) by
    /// `floor(amount * multiplier_tenths / 10)` and clear them.
    /// All-or-nothing on overflow.
    #[instrument(skip(self))]
    pub fn credit_insurees(
        &self,
        caller: &AccountId,
        airline: &AccountId,
        flight_code: &str,
        multiplier_tenths: u64,
    ) -> LedgerResult<()> {
        let mut state = self.enter(caller)?;
        let key = PolicyKey::new(*airline, flight_code);

        let state = &mut *state;
        let settlement = state
            .policies
            .settle(&key, multiplier_tenths, &mut state.credits)
            .inspect_err(|_| {
                warn!(airline = %airline, flight = flight_code, "Crediting aborted on overflow")
            })?;

        if settlement.policies() == 0 {
            debug!(airline = %airline, flight = flight_code, "No policies to credit");
            return Ok(());
        }

        info!(
            airline = %airline,
            flight = flight_code,
            policies = settlement.policies(),
            total = %settlement.total,
            "Insurees credited"
        );
        self.events.publish(LedgerEvent::InsureesCredited {
            airline: *airline,
            flight_code: flight_code.to_string(),
            policies: settlement.policies(),
            total: settlement.total,
        });
        Ok(())
    }

    pub fn balance_of(
        &self,
        caller: &AccountId,
        insuree: &AccountId,
    ) -> LedgerResult<u64> {
        Ok(self.enter(caller)?.credits.balance_of(insuree))
    }

    /// Pay out an insuree's whole balance.
    ///
    /// Balance and reserve are debited under the lock; the payout rail is
    /// called after the lock is released. A failed payout puts both back
    /// and returns [`LedgerError::TransferFailed`].
    #[instrument(skip(self))]
    pub fn withdraw_credits_for_insuree(
        &self,
        caller: &AccountId,
        insuree: &AccountId,
    ) -> LedgerResult<u64> {
        let amount = {
            let mut state = self.enter(caller)?;

            let balance = state.credits.balance_of(insuree);
            if balance == 0 {
                debug!(insuree = %insuree, "Nothing to withdraw");
                return Err(LedgerError::InsufficientCredits { insuree: *insuree });
            }
            state.treasury.ensure_covers(balance)?;

            let amount = state.credits.drain(insuree)?;
            state.treasury.debit(amount)?;
            amount
        };

        if let Err(e) = self.payouts.transfer(insuree, amount) {
            warn!(insuree = %insuree, amount = amount, error = %e, "Payout failed, restoring credits");

            let mut state = self.state.lock();
            let restored = state.credits.restore(insuree, amount);
            let restored = restored.and_then(|()| state.treasury.refund(amount));
            if let Err(restore_err) = restored {
                error!(insuree = %insuree, amount = amount, error = %restore_err, "Failed to restore credits");
                return Err(restore_err);
            }
            return Err(LedgerError::TransferFailed(e.to_string()));
        }

        info!(insuree = %insuree, amount = amount, "Credits withdrawn");
        self.events.publish(LedgerEvent::CreditsWithdrawn {
            insuree: *insuree,
            amount,
        });
        Ok(amount)
    }

    // ============ TREASURY ============

    /// Accept incoming value. Open to any caller in any gate state.
    #[instrument(skip(self))]
    pub fn accept_deposit(
        &self,
        from: &AccountId,
        amount: u64,
    ) -> LedgerResult<u64> {
        let mut state = self.state.lock();
        let reserve = state.treasury.deposit(amount)?;

        info!(from = %from, amount = amount, reserve = reserve, "Deposit received");
        self.events.publish(LedgerEvent::DepositReceived {
            from: *from,
            amount,
        });
        Ok(reserve)
    }

    pub fn reserve(&self, caller: &AccountId) -> LedgerResult<u64> {
        Ok(self.enter(caller)?.treasury.reserve())
    }

    /// Counts and totals across every store, read in one critical section
    pub fn summary(&self, caller: &AccountId) -> LedgerResult<LedgerSummary> {
        let state = self.enter(caller)?;
        Ok(LedgerSummary {
            airlines: state.airlines.count(),
            registered_airlines: state.airlines.registered().len(),
            flights: state.flights.count(),
            open_policy_keys: state.policies.open_keys(),
            outstanding_credit: state.credits.outstanding(),
            reserve: state.treasury.reserve(),
            total_deposited: state.treasury.total_deposited(),
            total_paid_out: state.treasury.total_paid_out(),
            authorized_callers: state.access.authorized().len(),
            event_subscribers: self.events.subscriber_count(),
        })
    }

    // ============ SNAPSHOTS ============

    /// Owner-only; works while the gate is closed
    pub fn snapshot(&self, caller: &AccountId) -> LedgerResult<LedgerSnapshot> {
        let state = self.enter_as_owner(caller)?;
        Ok(LedgerSnapshot::capture(&state))
    }
}
