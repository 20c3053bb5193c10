//! End-to-end tests: configuration, poll aggregation and the shared engine
//! wired together the way a host node would.

use std::thread;

use snowfall_consensus::{Bag, Block, DecisionListener, PollSet};
use snowfall_node::{EngineConfig, NodeError, SharedEngine};
use snowfall_nullables::{ChainBuilder, Decision, NullBlock, RecordingListener};
use snowfall_types::NodeId;

fn validators(n: u8) -> Vec<NodeId> {
    (0..n).map(|i| NodeId::new([i; 20])).collect()
}

fn small_config() -> EngineConfig {
    EngineConfig::from_toml_str(
        r#"
        k = 5
        alpha = 4
        beta_virtuous = 2
        beta_rogue = 3
        "#,
    )
    .expect("should parse")
}

#[test]
fn aggregated_polls_decide_a_fork() {
    let config = small_config();
    let mut chain = ChainBuilder::new();
    let mut engine = config
        .build_engine::<NullBlock, _>(chain.genesis(), 0, RecordingListener::new())
        .unwrap();
    let a = chain.child_of_genesis();
    let b = chain.child_of_genesis();
    engine.add(a.clone()).unwrap();
    engine.add(b.clone()).unwrap();

    let sample = validators(5);
    let mut polls = PollSet::new(config.alpha);
    for request_id in 0..3 {
        polls.add(request_id, sample.iter().copied());
        for (i, node) in sample.iter().enumerate() {
            let choice = if i == 0 { b.id() } else { a.id() };
            for votes in polls.vote(request_id, node, choice) {
                engine.record_poll(&votes);
            }
        }
    }

    assert!(polls.is_empty());
    assert_eq!(engine.last_accepted(), a.id());
    assert_eq!(
        engine.listener().decisions(),
        &[Decision::Accepted(a.id()), Decision::Rejected(b.id())]
    );
}

#[test]
fn unresponsive_validators_falter_the_poll() {
    let config = small_config();
    let mut chain = ChainBuilder::new();
    let mut engine = config
        .build_engine::<NullBlock, _>(chain.genesis(), 0, RecordingListener::new())
        .unwrap();
    let a = chain.child_of_genesis();
    engine.add(a.clone()).unwrap();

    let sample = validators(5);
    let mut polls = PollSet::new(config.alpha);

    polls.add(1, sample.iter().copied());
    let mut ready = polls.vote(1, &sample[0], a.id());
    ready.extend(polls.drop_node(1, &sample[1]));
    assert!(ready.is_empty());
    // Three weight units left in reach, alpha is four.
    ready.extend(polls.drop_node(1, &sample[2]));
    assert_eq!(ready.len(), 1);
    engine.record_poll(&ready[0]);

    assert_eq!(engine.last_accepted(), chain.genesis());
    assert_eq!(engine.num_processing(), 1);
    assert_eq!(engine.poll_number(), 1);
}

#[test]
fn invalid_config_refuses_to_build() {
    let config = EngineConfig {
        alpha: 0,
        ..EngineConfig::default()
    };
    let chain = ChainBuilder::new();
    let result =
        config.build_engine::<NullBlock, _>(chain.genesis(), 0, RecordingListener::new());
    assert!(matches!(result, Err(NodeError::Consensus(_))));
}

#[test]
fn shared_engine_serves_readers_during_polls() {
    let config = small_config();
    let mut chain = ChainBuilder::new();
    let engine = config
        .build_engine::<NullBlock, _>(chain.genesis(), 0, RecordingListener::new())
        .unwrap();
    let shared = SharedEngine::new(engine);

    let mut blocks = Vec::new();
    let mut parent = chain.child_of_genesis();
    shared.add(parent.clone()).unwrap();
    blocks.push(parent.clone());
    for _ in 0..9 {
        let next = chain.child(&parent);
        shared.add(next.clone()).unwrap();
        blocks.push(next.clone());
        parent = next;
    }
    let tip = parent.id();
    assert_eq!(shared.preferred(), tip);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                let mut last_height = 0;
                for _ in 0..200 {
                    let height = shared.last_accepted_height();
                    assert!(height >= last_height);
                    last_height = height;
                    assert!(shared.num_processing() <= 10);
                }
            })
        })
        .collect();

    let votes: Bag = [(tip, 5)].into_iter().collect();
    shared.record_poll(&votes);
    shared.record_poll(&votes);

    for reader in readers {
        reader.join().expect("reader thread panicked");
    }

    assert_eq!(shared.last_accepted(), tip);
    assert_eq!(shared.last_accepted_height(), 10);
    assert_eq!(shared.num_processing(), 0);
    for block in &blocks {
        assert!(shared.is_accepted(&block.id()));
    }
    let accepted = shared.with_listener(|l| l.accepted());
    assert_eq!(accepted, blocks.iter().map(Block::id).collect::<Vec<_>>());
}

#[test]
fn late_child_of_loser_is_rejected_through_shared_handle() {
    let config = small_config();
    let mut chain = ChainBuilder::new();
    let shared = SharedEngine::new(
        config
            .build_engine::<NullBlock, _>(chain.genesis(), 0, RecordingListener::new())
            .unwrap(),
    );
    let a = chain.child_of_genesis();
    let b = chain.child_of_genesis();
    shared.add(a.clone()).unwrap();
    shared.add(b.clone()).unwrap();

    let votes: Bag = [(a.id(), 5)].into_iter().collect();
    for _ in 0..3 {
        shared.record_poll(&votes);
    }
    assert!(shared.is_rejected(&b.id()));

    let late = chain.child(&b);
    shared.add(late.clone()).unwrap();
    assert!(shared.is_rejected(&late.id()));
    assert_eq!(shared.num_processing(), 0);
}

/// Panics on the first acceptance, then counts the rest.
#[derive(Default)]
struct FlakyListener {
    failed: bool,
    accepted: usize,
}

impl DecisionListener<NullBlock> for FlakyListener {
    fn on_accept(&mut self, block: &NullBlock) {
        if !self.failed {
            self.failed = true;
            panic!("listener failed on {}", block.id());
        }
        self.accepted += 1;
    }

    fn on_reject(&mut self, _block: &NullBlock) {}
}

#[test]
fn shared_engine_recovers_from_listener_panic() {
    let config = small_config();
    let mut chain = ChainBuilder::new();
    let shared = SharedEngine::new(
        config
            .build_engine::<NullBlock, _>(chain.genesis(), 0, FlakyListener::default())
            .unwrap(),
    );
    let a = chain.child_of_genesis();
    let b = chain.child_of_genesis();
    shared.add(a.clone()).unwrap();
    shared.add(b.clone()).unwrap();

    let votes: Bag = [(a.id(), 5)].into_iter().collect();
    let worker = {
        let shared = shared.clone();
        thread::spawn(move || {
            for _ in 0..3 {
                shared.record_poll(&votes);
            }
        })
    };
    assert!(worker.join().is_err());

    // The lock is poisoned but the decision is already in place.
    assert_eq!(shared.last_accepted(), a.id());
    assert_eq!(shared.last_accepted_height(), 1);
    assert!(shared.is_rejected(&b.id()));

    let next = chain.child(&a);
    shared.add(next.clone()).unwrap();
    let votes: Bag = [(next.id(), 5)].into_iter().collect();
    for _ in 0..2 {
        shared.record_poll(&votes);
    }
    assert_eq!(shared.last_accepted(), next.id());
    assert_eq!(shared.with_listener(|l| l.accepted), 1);
}
