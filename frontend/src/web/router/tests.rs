use super::*;

use std::cell::Cell;
use std::rc::Rc;

// =========================================================
// 辅助函数
// =========================================================

/// 计数清理回调
fn counting_cleanup(counter: Rc<Cell<u32>>) -> PageCleanup {
    Box::new(move || counter.set(counter.get() + 1))
}

// =========================================================
// NavLifecycle 测试
// =========================================================

#[test]
fn test_begin_returns_monotonic_sequence() {
    let lifecycle = NavLifecycle::new();
    let first = lifecycle.begin();
    let second = lifecycle.begin();
    assert!(second > first);
    assert!(lifecycle.is_current(second));
    assert!(!lifecycle.is_current(first));
}

#[test]
fn test_begin_runs_pending_cleanup_exactly_once() {
    let lifecycle = NavLifecycle::new();
    let counter = Rc::new(Cell::new(0));

    let seq = lifecycle.begin();
    assert!(lifecycle.finish(seq, Some(counting_cleanup(counter.clone()))));
    assert_eq!(counter.get(), 0);

    // 下一次导航开始时执行上一页的清理
    lifecycle.begin();
    assert_eq!(counter.get(), 1);

    // 之后的导航不再重复执行
    lifecycle.begin();
    assert_eq!(counter.get(), 1);
}

#[test]
fn test_stale_finish_is_discarded() {
    let lifecycle = NavLifecycle::new();
    let stale_counter = Rc::new(Cell::new(0));
    let fresh_counter = Rc::new(Cell::new(0));

    // 两次快速导航：第一次的加载完成时已过期
    let stale = lifecycle.begin();
    let fresh = lifecycle.begin();

    assert!(!lifecycle.finish(stale, Some(counting_cleanup(stale_counter.clone()))));
    assert!(lifecycle.finish(fresh, Some(counting_cleanup(fresh_counter.clone()))));

    // 只有最新导航的清理被挂起
    lifecycle.begin();
    assert_eq!(stale_counter.get(), 0);
    assert_eq!(fresh_counter.get(), 1);
}

#[test]
fn test_finish_without_cleanup_clears_pending() {
    let lifecycle = NavLifecycle::new();
    let counter = Rc::new(Cell::new(0));

    let seq = lifecycle.begin();
    assert!(lifecycle.finish(seq, Some(counting_cleanup(counter.clone()))));

    // begin 消费掉清理回调后，finish(None) 的页面不留挂起项
    let seq = lifecycle.begin();
    assert_eq!(counter.get(), 1);
    assert!(lifecycle.finish(seq, None));

    lifecycle.begin();
    assert_eq!(counter.get(), 1);
}

#[test]
fn test_interleaved_navigation_keeps_latest_only() {
    // 模拟慢加载页面 A、快加载页面 B 的交错完成
    let lifecycle = NavLifecycle::new();
    let a_cleanup = Rc::new(Cell::new(0));
    let b_cleanup = Rc::new(Cell::new(0));

    let nav_a = lifecycle.begin();
    let nav_b = lifecycle.begin();

    // B 先完成（最新），A 后完成（过期）
    assert!(lifecycle.finish(nav_b, Some(counting_cleanup(b_cleanup.clone()))));
    assert!(!lifecycle.finish(nav_a, Some(counting_cleanup(a_cleanup.clone()))));

    lifecycle.begin();
    assert_eq!(b_cleanup.get(), 1);
    assert_eq!(a_cleanup.get(), 0);
}
