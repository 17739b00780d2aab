use super::*;
use crate::transports::*;
use qr_cards::*;
use qr_core::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tokio::sync::oneshot;

const CHANNEL: &str = "room";

fn deck(cards: &[(&str, &str)]) -> Deck {
    Deck::new(
        "test deck",
        cards.iter().map(|(q, a)| Card::new(*q, [*a])).collect(),
    )
}

/// Spawns a room; the stop sender must stay alive for the whole session.
fn spawn(
    plan: Plan,
    source: Source,
    recorder: &Arc<Recorder>,
) -> (UnboundedSender<()>, oneshot::Receiver<Outcome>) {
    let (stop_tx, stop_rx) = unbounded_channel();
    let (done_tx, done_rx) = oneshot::channel();
    let transport = recorder.clone() as Arc<dyn Transport>;
    let room = Room::new(plan, source, transport, stop_rx)
        .with_broadcast(Some(ID::from("output")))
        .with_rng(SmallRng::seed_from_u64(7));
    tokio::spawn(room.run(done_tx));
    (stop_tx, done_rx)
}

fn recorder() -> (Arc<Recorder>, Mailbox) {
    let (recorder, mailbox) = Recorder::new();
    (Arc::new(recorder), mailbox)
}

#[tokio::test(start_paused = true)]
async fn two_participants_split_two_cards() {
    let (recorder, mut mailbox) = recorder();
    let plan = Plan::new(CHANNEL, "pair").win_limit(2);
    let (_stop, done) = spawn(plan, Source::Deck(deck(&[("Q1", "a"), ("Q2", "b")])), &recorder);

    let intro = mailbox.sent().await.unwrap();
    assert!(intro.text().unwrap().contains("First to 2 points wins."));
    assert_eq!(mailbox.sent().await, Some(Sent::Image("Q2".into())));
    assert!(recorder.say(CHANNEL, "u1", "b").await);
    let first = mailbox.embed().await.unwrap();
    assert_eq!(first.title, "✅ Correct: Q2");
    assert_eq!(first.get("Scorers - pair to 2"), Some("<@u1> 1p"));

    assert_eq!(mailbox.sent().await, Some(Sent::Image("Q1".into())));
    assert!(recorder.say(CHANNEL, "u2", "A").await);
    let second = mailbox.embed().await.unwrap();
    assert_eq!(second.get("Scorers - pair to 2"), Some("<@u2> 1p"));

    let board = mailbox.embed().await.unwrap();
    assert_eq!(board.title, "Final Quiz Scoreboard: pair");
    assert_eq!(board.get("Winner"), None);
    assert_eq!(
        board.get("Participants"),
        Some("<@u1>: 1 point(s)\n<@u2>: 1 point(s)\n")
    );
    assert_eq!(board.footer.as_deref(), Some("Q2\u{3000}Q1"));

    let outcome = done.await.unwrap();
    assert_eq!(outcome.ending, Ending::Exhausted);
    assert_eq!(outcome.review.map(|d| d.len()), Some(0));
    assert!(!recorder.is_subscribed(&ID::from(CHANNEL)));
}

#[tokio::test(start_paused = true)]
async fn consecutive_timeouts_abandon_the_session() {
    let (recorder, mut mailbox) = recorder();
    let cards = (0..7)
        .map(|i| (format!("Q{}", i), format!("a{}", i)))
        .collect::<Vec<_>>();
    let cards = cards
        .iter()
        .map(|(q, a)| (q.as_str(), a.as_str()))
        .collect::<Vec<_>>();
    let (_stop, done) = spawn(Plan::new(CHANNEL, "idle"), Source::Deck(deck(&cards)), &recorder);

    let outcome = done.await.unwrap();
    assert_eq!(outcome.ending, Ending::Abandoned);
    assert_eq!(outcome.review.map(|d| d.len()), Some(TIMEOUT_LIMIT));

    let sent = mailbox.pending().into_iter().map(|(_, s)| s).collect::<Vec<_>>();
    let asked = sent.iter().filter(|s| matches!(s, Sent::Image(_))).count();
    assert_eq!(asked, TIMEOUT_LIMIT);
    assert!(sent.contains(&Sent::Text(Protocol::abandoned().to_string())));
    let board = sent.last().and_then(Sent::embed).unwrap();
    assert_eq!(
        board.get("Note"),
        Some("Try `kq!quiz review` to replay the 5 failed question(s)\n")
    );
    assert!(board.footer.as_deref().unwrap().starts_with("*Q6"));
}

#[tokio::test(start_paused = true)]
async fn abandoned_sessions_keep_earlier_points() {
    let (recorder, mut mailbox) = recorder();
    let cards = (0..7)
        .map(|i| (format!("Q{}", i), format!("a{}", i)))
        .collect::<Vec<_>>();
    let cards = cards
        .iter()
        .map(|(q, a)| (q.as_str(), a.as_str()))
        .collect::<Vec<_>>();
    let (_stop, done) = spawn(Plan::new(CHANNEL, "early"), Source::Deck(deck(&cards)), &recorder);

    mailbox.sent().await;
    assert_eq!(mailbox.sent().await, Some(Sent::Image("Q6".into())));
    recorder.say(CHANNEL, "u", "a6").await;
    assert_eq!(mailbox.embed().await.unwrap().title, "✅ Correct: Q6");

    let outcome = done.await.unwrap();
    assert_eq!(outcome.ending, Ending::Abandoned);
    assert_eq!(outcome.standings, vec![(ID::from("u"), 1)]);
    assert_eq!(outcome.review.map(|d| d.len()), Some(TIMEOUT_LIMIT));
    let sent = mailbox.pending().into_iter().map(|(_, s)| s).collect::<Vec<_>>();
    let asked = sent.iter().filter(|s| matches!(s, Sent::Image(_))).count();
    assert_eq!(asked, TIMEOUT_LIMIT);
    assert!(!sent.contains(&Sent::Image("Q0".into())));
    let board = sent.last().and_then(Sent::embed).unwrap();
    assert_eq!(board.get("Participants"), Some("<@u>: 1 point(s)\n"));
}

#[tokio::test(start_paused = true)]
async fn sequential_abandon_on_the_last_card_has_nothing_to_resume() {
    let (recorder, mut mailbox) = recorder();
    let cards = [("q0", "a0"), ("q1", "a1"), ("q2", "a2"), ("q3", "a3"), ("q4", "a4")];
    let plan = Plan::new(CHANNEL, "seq").mode(Mode::Sequential { offset: 0 });
    let (_stop, done) = spawn(plan, Source::Deck(deck(&cards)), &recorder);

    let outcome = done.await.unwrap();
    assert_eq!(outcome.ending, Ending::Abandoned);
    assert_eq!(outcome.resume, None);
    let sent = mailbox.pending().into_iter().map(|(_, s)| s).collect::<Vec<_>>();
    let board = sent.last().and_then(Sent::embed).unwrap();
    assert_eq!(board.get("Resuming"), None);
}

#[tokio::test(start_paused = true)]
async fn sequential_abandon_resumes_at_the_abandoned_card() {
    let (recorder, mut mailbox) = recorder();
    let cards = (0..7)
        .map(|i| (format!("q{}", i), format!("a{}", i)))
        .collect::<Vec<_>>();
    let cards = cards
        .iter()
        .map(|(q, a)| (q.as_str(), a.as_str()))
        .collect::<Vec<_>>();
    let plan = Plan::new(CHANNEL, "seq").mode(Mode::Sequential { offset: 1 });
    let (_stop, done) = spawn(plan, Source::Deck(deck(&cards)), &recorder);

    let outcome = done.await.unwrap();
    assert_eq!(outcome.ending, Ending::Abandoned);
    assert_eq!(outcome.resume, Some(5));
    let sent = mailbox.pending().into_iter().map(|(_, s)| s).collect::<Vec<_>>();
    let board = sent.last().and_then(Sent::embed).unwrap();
    assert_eq!(
        board.get("Resuming"),
        Some("Try `kq!quiz seq 5-` to continue from #5\n")
    );
}

#[tokio::test(start_paused = true)]
async fn activity_resets_the_timeout_streak() {
    let (recorder, mut mailbox) = recorder();
    let cards = (0..6)
        .map(|i| (format!("Q{}", i), format!("a{}", i)))
        .collect::<Vec<_>>();
    let cards = cards
        .iter()
        .map(|(q, a)| (q.as_str(), a.as_str()))
        .collect::<Vec<_>>();
    let (_stop, done) = spawn(Plan::new(CHANNEL, "busy"), Source::Deck(deck(&cards)), &recorder);

    mailbox.sent().await;
    for i in (0..6).rev() {
        assert_eq!(mailbox.sent().await, Some(Sent::Image(format!("Q{}", i))));
        if i == 3 {
            recorder.say(CHANNEL, "u", "a3").await;
        }
        mailbox.embed().await;
    }
    let outcome = done.await.unwrap();
    assert_eq!(outcome.ending, Ending::Exhausted);
    assert_eq!(outcome.review.map(|d| d.len()), Some(5));
}

#[tokio::test(start_paused = true)]
async fn first_rank_is_kept() {
    let (recorder, mut mailbox) = recorder();
    let (_stop, done) = spawn(Plan::new(CHANNEL, "race").win_limit(1), Source::Deck(deck(&[("Q", "a")])), &recorder);

    mailbox.sent().await;
    mailbox.sent().await;
    recorder.say(CHANNEL, "slow", "wrong").await;
    recorder.say(CHANNEL, "fast", "a").await;
    recorder.say(CHANNEL, "slow", "a").await;
    recorder.say(CHANNEL, "fast", "a").await;
    let correct = mailbox.embed().await.unwrap();
    assert_eq!(correct.get("Scorers - race to 1"), Some("<@fast> 1p, <@slow> 1p"));
    let outcome = done.await.unwrap();
    assert_eq!(outcome.ending, Ending::Won);
    assert_eq!(outcome.standings.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn skip_token_ends_the_round() {
    let (recorder, mut mailbox) = recorder();
    let (_stop, done) = spawn(Plan::new(CHANNEL, "skip"), Source::Deck(deck(&[("Q", "a")])), &recorder);

    mailbox.sent().await;
    mailbox.sent().await;
    let asked = tokio::time::Instant::now();
    recorder.say(CHANNEL, "u", "..").await;
    let timed_out = mailbox.embed().await.unwrap();
    assert_eq!(timed_out.title, "⛔ Timed out! Q");
    assert_eq!(timed_out.description, "**a**");
    assert!(asked.elapsed() < std::time::Duration::from_secs(1));
    assert_eq!(done.await.unwrap().ending, Ending::Exhausted);
}

#[tokio::test(start_paused = true)]
async fn multi_answer_points_are_capped() {
    let (recorder, mut mailbox) = recorder();
    let card = Card::new("colors", ["red", "blue", "green", "white", "black"]);
    let plan = Plan::new(CHANNEL, "colors")
        .mode(Mode::Multi)
        .speed(Speed::Multi)
        .win_limit(3);
    let (_stop, done) = spawn(plan, Source::Deck(Deck::new("d", vec![card])), &recorder);

    assert!(mailbox.sent().await.unwrap().text().unwrap().contains("MULTI quiz"));
    mailbox.sent().await;
    for answer in ["red", "blue", "red", "green", "white"] {
        recorder.say(CHANNEL, "u1", answer).await;
    }
    recorder.say(CHANNEL, "u2", "white").await;
    recorder.say(CHANNEL, "u2", "black").await;
    let correct = mailbox.embed().await.unwrap();
    assert_eq!(
        correct.get("Scorers - colors to 1"),
        Some("<@u1> +3 (3p): red, blue, green, white\n<@u2> +2 (2p): white, black\n")
    );
    let board = mailbox.embed().await.unwrap();
    assert_eq!(board.get("Winner"), Some("<@u1>: 3 points\n"));
    let outcome = done.await.unwrap();
    assert_eq!(outcome.ending, Ending::Won);
    assert_eq!(outcome.review, None);
}

#[tokio::test(start_paused = true)]
async fn sequential_sessions_resume_where_they_stopped() {
    let (recorder, mut mailbox) = recorder();
    let cards = [
        ("q0", "a0"),
        ("q1", "a1"),
        ("q2", "a2"),
        ("q3", "a3"),
        ("q4", "a4"),
        ("q5", "a5"),
    ];
    let plan = Plan::new(CHANNEL, "seq").mode(Mode::Sequential { offset: 3 });
    let (_stop, done) = spawn(plan, Source::Deck(deck(&cards)), &recorder);

    let intro = mailbox.sent().await.unwrap();
    assert!(intro.text().unwrap().contains("Type kq!stop to give up."));
    assert_eq!(mailbox.sent().await, Some(Sent::Image("q3".into())));
    recorder.say(CHANNEL, "u", "a3").await;
    let correct = mailbox.embed().await.unwrap();
    assert_eq!(correct.title, "✅ #3 Correct: q3");
    assert_eq!(mailbox.sent().await, Some(Sent::Image("q4".into())));
    recorder.say(CHANNEL, "u", "KQ!STOP").await;

    let board = mailbox.embed().await.unwrap();
    assert_eq!(
        board.get("Resuming"),
        Some("Try `kq!quiz seq 4-` to continue from #4\n")
    );
    assert_eq!(board.get("Winner"), None);
    let outcome = done.await.unwrap();
    assert_eq!(outcome.ending, Ending::Stopped);
    assert_eq!(outcome.resume, Some(4));
}

#[tokio::test(start_paused = true)]
async fn stopping_a_review_keeps_unplayed_cards() {
    let (recorder, mut mailbox) = recorder();
    let cards = [("r1", "a1"), ("r2", "a2"), ("r3", "a3")];
    let (stop, done) = spawn(Plan::new(CHANNEL, REVIEW), Source::Deck(deck(&cards)), &recorder);

    let intro = mailbox.sent().await.unwrap();
    assert!(intro.text().unwrap().contains("First to 3 points wins."));
    assert_eq!(mailbox.sent().await, Some(Sent::Image("r3".into())));
    stop.send(()).unwrap();

    let outcome = done.await.unwrap();
    assert_eq!(outcome.ending, Ending::Stopped);
    let mut questions = outcome
        .review
        .unwrap()
        .cards
        .into_iter()
        .map(|c| c.question)
        .collect::<Vec<_>>();
    questions.sort();
    assert_eq!(questions, ["r1", "r2", "r3"]);
}

#[tokio::test(start_paused = true)]
async fn gauntlet_scores_accuracy_and_broadcasts() {
    let (recorder, mut mailbox) = recorder();
    let cards = [("g1", "a1"), ("g2", "a2"), ("g3", "a3")];
    let plan = Plan::new(CHANNEL, "blitz")
        .mode(Mode::Gauntlet { minutes: None })
        .host("host");
    let (_stop, done) = spawn(plan, Source::Deck(deck(&cards)), &recorder);

    let intro = mailbox.sent().await.unwrap();
    assert!(intro.text().unwrap().contains("within 120 seconds"));
    assert_eq!(mailbox.sent().await, Some(Sent::Image("g3".into())));
    recorder.say(CHANNEL, "host", "a3").await;
    assert_eq!(mailbox.sent().await, Some(Sent::Image("g2".into())));
    recorder.say(CHANNEL, "host", "nope").await;
    assert_eq!(mailbox.sent().await, Some(Sent::Image("g1".into())));
    recorder.say(CHANNEL, "host", "a1").await;

    let (channel, score) = mailbox.next().await.unwrap();
    assert_eq!(channel, ID::from(CHANNEL));
    let score = score.embed().cloned().unwrap();
    assert_eq!(score.title, "Final Gauntlet Score: blitz");
    assert_eq!(score.description, "1.33 points in 0 seconds");
    assert_eq!(score.footer.as_deref(), Some("Mistakes: g2"));
    let (channel, broadcast) = mailbox.next().await.unwrap();
    assert_eq!(channel, ID::from("output"));
    assert_eq!(
        broadcast.embed().unwrap().description,
        "<@host>: 1.33 points in 0 seconds"
    );
    let outcome = done.await.unwrap();
    assert_eq!(outcome.ending, Ending::Exhausted);
    assert_eq!(outcome.review, None);
}

#[tokio::test(start_paused = true)]
async fn gauntlet_clock_runs_out() {
    let (recorder, mut mailbox) = recorder();
    let plan = Plan::new(CHANNEL, "blitz").mode(Mode::Gauntlet { minutes: Some(1) });
    let (_stop, done) = spawn(plan, Source::Deck(deck(&[("g1", "a1")])), &recorder);

    let outcome = done.await.unwrap();
    assert_eq!(outcome.ending, Ending::Expired);
    let sent = mailbox.pending();
    let score = sent.iter().find_map(|(_, s)| s.embed()).unwrap();
    assert_eq!(score.description, "0.00 points in 60 seconds");
    assert!(sent.iter().all(|(c, _)| *c == ID::from(CHANNEL)));
}

#[tokio::test(start_paused = true)]
async fn scramble_accepts_the_word() {
    let (recorder, mut mailbox) = recorder();
    let pool = Arc::new(ScramblePool::from_words(["zebras"]));
    let plan = Plan::new(CHANNEL, "scramble").mode(Mode::Scramble { difficulty: Difficulty::Normal });
    let (_stop, done) = spawn(plan, Source::Pool(pool), &recorder);

    let intro = mailbox.sent().await.unwrap();
    assert!(intro.text().unwrap().contains("Starting new Scramble quiz (1 questions)"));
    let Some(Sent::Image(scrambled)) = mailbox.sent().await else {
        panic!("expected a scrambled word");
    };
    assert_ne!(scrambled, "zebras");
    assert_eq!(signature(&scrambled), signature("zebras"));
    recorder.say(CHANNEL, "u", "ZEBRAS").await;
    let correct = mailbox.embed().await.unwrap();
    assert_eq!(correct.get("Scorers - Scramble to 10"), Some("<@u> 1p"));
    let board = mailbox.embed().await.unwrap();
    assert_eq!(board.footer.as_deref(), Some("zebras"));
    let outcome = done.await.unwrap();
    assert_eq!(outcome.ending, Ending::Exhausted);
    assert_eq!(outcome.review, None);
}

#[tokio::test(start_paused = true)]
async fn transport_failures_do_not_stall_the_session() {
    let (recorder, _mailbox) = recorder();
    recorder.break_sends(true);
    let (_stop, done) = spawn(Plan::new(CHANNEL, "mute"), Source::Deck(deck(&[("Q", "a")])), &recorder);
    let outcome = done.await.unwrap();
    assert_eq!(outcome.ending, Ending::Exhausted);
    assert_eq!(outcome.review.map(|d| d.len()), Some(1));
}
