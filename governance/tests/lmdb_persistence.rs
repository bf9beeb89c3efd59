//! The engine over a real LMDB environment, across reopen.

use ballot_governance::{CallContext, ElectionParams, GovernanceEngine};
use ballot_store::{CandidateStore, Counter, MetaStore};
use ballot_store_lmdb::{check_integrity, LmdbEnvironment};
use ballot_types::{AccountId, BlockHeight, GovernanceConfig};

const MAP_SIZE: usize = 16 * 1024 * 1024;

fn ctx(caller: &str, height: u64) -> CallContext {
    CallContext::new(AccountId::new(caller), BlockHeight::new(height))
}

fn open(path: &std::path::Path, owner: &str) -> GovernanceEngine<LmdbEnvironment> {
    let env = LmdbEnvironment::open(path, MAP_SIZE).unwrap();
    GovernanceEngine::open(env, GovernanceConfig::genesis(AccountId::new(owner))).unwrap()
}

#[test]
fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut engine = open(dir.path(), "owner");
        engine.set_vote_expiry_period(&ctx("owner", 1), 25).unwrap();
        let params = ElectionParams {
            name: "board".into(),
            description: String::new(),
            election_type: 2,
            duration: 50,
            quorum: 0,
            allow_abstain: false,
            require_registration: true,
        };
        let id = engine.create_election(&ctx("owner", 1), params).unwrap();
        engine.add_candidate(&ctx("owner", 1), id, 1, "one", "", None).unwrap();
        engine.add_candidate(&ctx("owner", 1), id, 2, "two", "", Some([7; 32])).unwrap();
        engine.register_voter(&ctx("alice", 2), 9).unwrap();
        engine.register_voter(&ctx("bob", 2), 4).unwrap();
        engine.cast_vote(&ctx("alice", 3), id, 2, None).unwrap();
        engine.cast_vote(&ctx("bob", 3), id, 2, None).unwrap();
    }

    // a different genesis owner must not replace the persisted config
    let engine = open(dir.path(), "someone-else");
    let config = engine.config().unwrap();
    assert_eq!(config.owner.as_str(), "owner");
    assert_eq!(config.vote_expiry_period, 25);
    assert_eq!(config.version, 2);

    let store = engine.store();
    assert_eq!(store.get_counter(Counter::ElectionCount).unwrap(), 1);
    assert_eq!(store.get_counter(Counter::RegisteredVoters).unwrap(), 2);
    let tally = store.get_tally(1, 2).unwrap().unwrap();
    assert_eq!((tally.vote_count, tally.weighted_votes), (2, 13));
    assert_eq!(
        store.get_candidate(1, 2).unwrap().unwrap().content_hash,
        Some([7; 32])
    );
    assert_eq!(engine.get_voter(&AccountId::new("alice")).unwrap().unwrap().total_votes_cast, 1);
    assert!(engine.verify_tallies(1).unwrap().is_empty());

    let report = check_integrity(store).unwrap();
    assert!(report.is_healthy(), "{:?}", report.errors);
}

#[test]
fn expired_votes_swept_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(dir.path(), "owner");
    engine.set_vote_expiry_period(&ctx("owner", 1), 5).unwrap();
    let params = ElectionParams {
        name: "short".into(),
        description: String::new(),
        election_type: 1,
        duration: 100,
        quorum: 0,
        allow_abstain: false,
        require_registration: false,
    };
    let id = engine.create_election(&ctx("owner", 1), params).unwrap();
    engine.add_candidate(&ctx("owner", 1), id, 1, "one", "", None).unwrap();
    for name in ["a", "b", "c"] {
        engine.cast_vote(&ctx(name, 2), id, 1, None).unwrap();
    }
    engine.cast_vote(&ctx("d", 6), id, 1, None).unwrap();

    assert_eq!(engine.sweep_expired_votes(&ctx("janitor", 8), id).unwrap(), 3);
    drop(engine);

    let engine = open(dir.path(), "owner");
    let tally = engine.store().get_tally(id, 1).unwrap().unwrap();
    assert_eq!(tally.vote_count, 1);
    assert!(engine.get_vote(id, &AccountId::new("d")).unwrap().is_some());
    assert!(engine.verify_tallies(id).unwrap().is_empty());
}
