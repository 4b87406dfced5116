use super::*;

const MS: Duration = Duration::from_millis(1);

#[test]
fn manual_fires_only_when_due() {
    let mut s = ManualScheduler::new();
    s.schedule(TickToken(1), 100 * MS);
    assert!(s.advance(99 * MS).is_empty());
    assert_eq!(s.advance(MS), vec![TickToken(1)]);
    assert_eq!(s.pending_len(), 0);
    assert_eq!(s.now(), 100 * MS);
}

#[test]
fn manual_orders_by_due_time_then_schedule_order() {
    let mut s = ManualScheduler::new();
    s.schedule(TickToken(3), 50 * MS);
    s.schedule(TickToken(1), 10 * MS);
    s.schedule(TickToken(2), 10 * MS);
    assert_eq!(
        s.advance(60 * MS),
        vec![TickToken(1), TickToken(2), TickToken(3)]
    );
}

#[test]
fn manual_cancel_suppresses_delivery() {
    let mut s = ManualScheduler::new();
    s.schedule(TickToken(1), 10 * MS);
    s.cancel(TickToken(1));
    s.cancel(TickToken(9));
    assert!(s.advance(100 * MS).is_empty());
    assert_eq!(s.cancelled_count(), 1);
    assert_eq!(s.last_cancelled(), Some(TickToken(1)));
}

#[test]
fn manual_cancel_record_stays_constant_size() {
    let mut s = ManualScheduler::new();
    for n in 0..10_000 {
        s.schedule(TickToken(n), 10 * MS);
        s.cancel(TickToken(n));
    }
    assert_eq!(s.pending_len(), 0);
    assert_eq!(s.cancelled_count(), 10_000);
    assert_eq!(s.last_cancelled(), Some(TickToken(9_999)));
}

#[test]
fn manual_fire_next_jumps_the_clock() {
    let mut s = ManualScheduler::new();
    assert_eq!(s.fire_next(), None);
    s.schedule(TickToken(7), 250 * MS);
    assert_eq!(s.fire_next(), Some(TickToken(7)));
    assert_eq!(s.now(), 250 * MS);
}

#[tokio::test(start_paused = true)]
async fn tokio_delivers_after_delay() {
    let (mut s, mut rx) = TokioScheduler::new();
    let start = tokio::time::Instant::now();
    s.schedule(TickToken(1), 200 * MS);
    assert_eq!(rx.recv().await, Some(TickToken(1)));
    assert!(start.elapsed() >= 200 * MS);
}

#[tokio::test(start_paused = true)]
async fn tokio_cancel_suppresses_delivery() {
    let (mut s, mut rx) = TokioScheduler::new();
    s.schedule(TickToken(1), 200 * MS);
    s.cancel(TickToken(1));
    let got = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
    assert!(got.is_err());
}

#[tokio::test(start_paused = true)]
async fn tokio_cancel_of_other_token_keeps_pending_tick() {
    let (mut s, mut rx) = TokioScheduler::new();
    s.schedule(TickToken(2), 50 * MS);
    s.cancel(TickToken(1));
    assert_eq!(rx.recv().await, Some(TickToken(2)));
}
