//! End-to-end governance scenarios against the in-memory store.

use std::sync::{Arc, Mutex};

use ballot_governance::{
    CallContext, CleanupOutcome, ElectionParams, GovernanceEngine, GovernanceError,
    GovernanceEvent, ProposalParams,
};
use ballot_nullables::NullStore;
use ballot_store::CandidateStore;
use ballot_types::{AccountId, BlockHeight, CandidateId, ElectionId, ElectionType, GovernanceConfig};

const OWNER: &str = "owner";

fn engine() -> GovernanceEngine<NullStore> {
    GovernanceEngine::open(NullStore::new(), GovernanceConfig::genesis(AccountId::new(OWNER)))
        .unwrap()
}

fn ctx(caller: &str, height: u64) -> CallContext {
    CallContext::new(AccountId::new(caller), BlockHeight::new(height))
}

fn election(
    engine: &mut GovernanceEngine<NullStore>,
    election_type: ElectionType,
    quorum: u8,
    require_registration: bool,
    candidates: &[CandidateId],
) -> ElectionId {
    let params = ElectionParams {
        name: "council".into(),
        description: String::new(),
        election_type: election_type.as_u8(),
        duration: 100,
        quorum,
        allow_abstain: true,
        require_registration,
    };
    let id = engine.create_election(&ctx(OWNER, 1), params).unwrap();
    for &candidate in candidates {
        engine
            .add_candidate(&ctx(OWNER, 1), id, candidate, format!("c{candidate}"), "", None)
            .unwrap();
    }
    id
}

fn weighted(engine: &GovernanceEngine<NullStore>, id: ElectionId, candidate: CandidateId) -> u64 {
    engine
        .store()
        .get_tally(id, candidate)
        .unwrap()
        .map_or(0, |t| t.weighted_votes)
}

#[test]
fn weighted_election_runs_to_finalization() {
    let mut engine = engine();
    let id = election(&mut engine, ElectionType::Weighted, 50, true, &[1, 2]);
    for (name, power) in [("alice", 10), ("bob", 5), ("carol", 3)] {
        engine.register_voter(&ctx(name, 2), power).unwrap();
    }

    engine.cast_vote(&ctx("alice", 3), id, 1, None).unwrap();
    engine.cast_vote(&ctx("bob", 3), id, 2, None).unwrap();
    engine.cast_vote(&ctx("carol", 4), id, 2, None).unwrap();
    assert_eq!(weighted(&engine, id, 1), 10);
    assert_eq!(weighted(&engine, id, 2), 8);

    let early = engine.finalize_election(&ctx(OWNER, 50), id);
    assert!(matches!(early, Err(GovernanceError::NotYetEnded { .. })));

    let result = engine.finalize_election(&ctx(OWNER, 101), id).unwrap();
    assert_eq!(result.winner, Some(1));
    assert_eq!(result.total_votes, 3);
    assert_eq!(result.turnout_percent, 100);
    assert!(result.quorum_met);
    assert!(!engine.get_election_info(id).unwrap().unwrap().active);
    assert_eq!(engine.get_election_results(id).unwrap(), Some(result));

    assert!(matches!(
        engine.finalize_election(&ctx(OWNER, 102), id),
        Err(GovernanceError::AlreadyFinalized(_))
    ));
}

#[test]
fn unregistered_voter_rejected_when_registration_required() {
    let mut engine = engine();
    let id = election(&mut engine, ElectionType::Simple, 0, true, &[1]);
    let err = engine.cast_vote(&ctx("dave", 2), id, 1, None).unwrap_err();
    assert!(matches!(err, GovernanceError::NotEligible(_)));
    assert!(engine.get_vote(id, &AccountId::new("dave")).unwrap().is_none());
}

#[test]
fn delegated_power_follows_delegation() {
    let mut engine = engine();
    let id = election(&mut engine, ElectionType::Delegated, 0, true, &[1, 2]);
    engine.register_voter(&ctx("alice", 2), 10).unwrap();
    engine.register_voter(&ctx("bob", 2), 5).unwrap();
    let (alice, bob) = (AccountId::new("alice"), AccountId::new("bob"));

    engine.delegate_vote(&ctx("bob", 3), id, &alice).unwrap();
    assert_eq!(engine.get_effective_voting_power(id, &bob).unwrap(), 0);
    assert_eq!(engine.get_effective_voting_power(id, &alice).unwrap(), 15);
    assert!(matches!(
        engine.cast_vote(&ctx("bob", 4), id, 2, None),
        Err(GovernanceError::ZeroVotingPower)
    ));

    let vote = engine.cast_vote(&ctx("alice", 4), id, 1, None).unwrap();
    assert_eq!(vote.voting_power, 15);
    assert!(vote.is_delegated);
    assert_eq!(vote.delegators, vec![bob.clone()]);
    // one vote, one count outside weighted elections
    assert_eq!(vote.weight, 1);

    // revoking afterwards leaves the cast vote untouched
    engine.revoke_delegation(&ctx("bob", 5), id).unwrap();
    assert_eq!(engine.get_delegated_power(&alice, id).unwrap().total_power, 0);
    assert_eq!(engine.get_vote(id, &alice).unwrap(), Some(vote));
    assert_eq!(engine.get_effective_voting_power(id, &bob).unwrap(), 5);
    engine.cast_vote(&ctx("bob", 6), id, 2, None).unwrap();
    assert!(engine.verify_tallies(id).unwrap().is_empty());
}

#[test]
fn delegation_rejected_outside_delegated_elections() {
    let mut engine = engine();
    let id = election(&mut engine, ElectionType::Simple, 0, false, &[1]);
    let err = engine
        .delegate_vote(&ctx("bob", 2), id, &AccountId::new("alice"))
        .unwrap_err();
    assert!(matches!(err, GovernanceError::WrongElectionType { .. }));
}

#[test]
fn vote_expires_and_is_cleaned_up_once() {
    let mut engine = engine();
    engine.set_vote_expiry_period(&ctx(OWNER, 1), 10).unwrap();
    let id = election(&mut engine, ElectionType::Simple, 0, false, &[1, 2]);
    let alice = AccountId::new("alice");

    engine.cast_vote(&ctx("alice", 5), id, 1, None).unwrap();
    assert!(engine.is_vote_valid(id, &alice, BlockHeight::new(15)).unwrap());
    assert!(!engine.is_vote_valid(id, &alice, BlockHeight::new(16)).unwrap());

    assert_eq!(
        engine.cleanup_expired_vote(&ctx("anyone", 15), id, &alice).unwrap(),
        CleanupOutcome::StillValid
    );
    assert_eq!(
        engine.cleanup_expired_vote(&ctx("anyone", 16), id, &alice).unwrap(),
        CleanupOutcome::Removed {
            candidate_id: 1,
            weight: 1
        }
    );
    assert_eq!(
        engine.cleanup_expired_vote(&ctx("anyone", 17), id, &alice).unwrap(),
        CleanupOutcome::NoVote
    );
    assert_eq!(weighted(&engine, id, 1), 0);

    // the voter may vote again once the stale vote is gone
    engine.cast_vote(&ctx("alice", 18), id, 2, None).unwrap();
    assert_eq!(weighted(&engine, id, 2), 1);
    assert!(engine.verify_tallies(id).unwrap().is_empty());
}

#[test]
fn ranked_election_resolves_by_runoff() {
    let mut engine = engine();
    let id = election(&mut engine, ElectionType::Ranked, 0, false, &[1, 2, 3]);
    let ballots: [(&str, Vec<CandidateId>); 5] = [
        ("v1", vec![1, 3, 2]),
        ("v2", vec![1, 3, 2]),
        ("v3", vec![2, 3, 1]),
        ("v4", vec![2, 3, 1]),
        ("v5", vec![3, 2, 1]),
    ];
    for (voter, ranking) in ballots {
        engine
            .cast_vote(&ctx(voter, 2), id, ranking[0], Some(ranking))
            .unwrap();
    }
    // candidate 3 is eliminated first and its ballot moves to 2
    let result = engine.finalize_election(&ctx(OWNER, 101), id).unwrap();
    assert_eq!(result.winner, Some(2));
}

#[test]
fn ranking_must_start_with_the_chosen_candidate() {
    let mut engine = engine();
    let id = election(&mut engine, ElectionType::Ranked, 0, false, &[1, 2]);
    let err = engine
        .cast_vote(&ctx("v1", 2), id, 1, Some(vec![2, 1]))
        .unwrap_err();
    assert!(matches!(err, GovernanceError::InvalidRankedChoices(_)));
}

#[test]
fn failed_commit_leaves_no_partial_state() {
    let mut engine = engine();
    let id = election(&mut engine, ElectionType::Simple, 0, false, &[1]);
    let alice = AccountId::new("alice");

    engine.store().fail_commits(true);
    let err = engine.cast_vote(&ctx("alice", 2), id, 1, None).unwrap_err();
    assert!(matches!(err, GovernanceError::Store(_)));
    engine.store().fail_commits(false);

    assert!(engine.get_vote(id, &alice).unwrap().is_none());
    assert_eq!(weighted(&engine, id, 1), 0);
    engine.cast_vote(&ctx("alice", 3), id, 1, None).unwrap();
    assert_eq!(weighted(&engine, id, 1), 1);
}

#[test]
fn events_follow_successful_commits_only() {
    let mut engine = engine();
    let seen: Arc<Mutex<Vec<GovernanceEvent>>> = Arc::default();
    let sink = Arc::clone(&seen);
    engine.subscribe(Box::new(move |event| sink.lock().unwrap().push(event.clone())));

    let id = election(&mut engine, ElectionType::Simple, 0, false, &[1]);
    engine.cast_vote(&ctx("alice", 2), id, 1, None).unwrap();
    assert!(engine.cast_vote(&ctx("alice", 3), id, 1, None).is_err());

    let events = seen.lock().unwrap();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], GovernanceEvent::ElectionCreated { .. }));
    assert!(matches!(events[1], GovernanceEvent::CandidateAdded { .. }));
    assert_eq!(
        events[2],
        GovernanceEvent::VoteCast {
            election_id: id,
            voter: AccountId::new("alice"),
            candidate_id: 1,
            weight: 1,
        }
    );
}

#[test]
fn pause_blocks_new_elections_until_resumed() {
    let mut engine = engine();
    engine.set_emergency_pause(&ctx(OWNER, 1)).unwrap();
    let params = ElectionParams {
        name: "x".into(),
        description: String::new(),
        election_type: 1,
        duration: 10,
        quorum: 0,
        allow_abstain: false,
        require_registration: false,
    };
    assert!(matches!(
        engine.create_election(&ctx(OWNER, 2), params.clone()),
        Err(GovernanceError::SystemPaused)
    ));
    assert!(matches!(
        engine.resume_operations(&ctx("mallory", 3)),
        Err(GovernanceError::Unauthorized(_))
    ));
    let config = engine.resume_operations(&ctx(OWNER, 3)).unwrap();
    assert!(!config.paused);
    assert_eq!(config.version, 3);
    engine.create_election(&ctx(OWNER, 4), params).unwrap();
}

#[test]
fn proposal_lifecycle() {
    let mut engine = engine();
    engine.register_voter(&ctx("alice", 1), 10).unwrap();
    engine.register_voter(&ctx("bob", 1), 5).unwrap();
    let id = engine
        .create_proposal(
            &ctx("alice", 1),
            ProposalParams {
                title: "raise quorum".into(),
                description: String::new(),
                kind: 2,
                voting_duration: 10,
                execution_delay: 5,
                min_approval: 60,
            },
        )
        .unwrap();

    assert!(matches!(
        engine.vote_on_proposal(&ctx("bob", 2), id, 1, 6),
        Err(GovernanceError::ExcessVotingPower {
            supplied: 6,
            available: 5
        })
    ));
    engine.vote_on_proposal(&ctx("alice", 2), id, 0, 10).unwrap();
    engine.vote_on_proposal(&ctx("bob", 3), id, 1, 5).unwrap();
    assert!(matches!(
        engine.vote_on_proposal(&ctx("bob", 4), id, 1, 5),
        Err(GovernanceError::AlreadyVoted { .. })
    ));

    assert!(matches!(
        engine.execute_proposal(&ctx("carol", 10), id),
        Err(GovernanceError::ProposalStillVoting(_))
    ));
    assert!(matches!(
        engine.execute_proposal(&ctx("carol", 12), id),
        Err(GovernanceError::ExecutionDelayPending { .. })
    ));
    let executed = engine.execute_proposal(&ctx("carol", 16), id).unwrap();
    assert!(executed.executed);
    assert_eq!((executed.votes_for, executed.votes_against), (10, 5));
    assert!(matches!(
        engine.execute_proposal(&ctx("carol", 17), id),
        Err(GovernanceError::AlreadyExecuted(_))
    ));
}
