use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use falling_blocks::core::{GameSnapshot, Session, SessionConfig};
use falling_blocks::term::{FrameBuffer, GameView, Viewport};
use falling_blocks::types::{GameAction, CLEAR_FLASH_MS};

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = layout;
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = (layout, new_size);
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

#[test]
fn session_hot_paths_do_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let mut session = Session::new(&SessionConfig::default());
    session.reset();
    let mut snap = GameSnapshot::default();

    // Warm-up.
    let _ = session.tick(16);
    let _ = session.apply_action(GameAction::MoveLeft);

    let allocs = with_alloc_counting(|| {
        for _ in 0..200 {
            let _ = session.tick(16);
        }

        for _ in 0..50 {
            let _ = session.apply_action(GameAction::MoveLeft);
            let _ = session.apply_action(GameAction::MoveRight);
            let _ = session.apply_action(GameAction::RotateCw);
            let _ = session.apply_action(GameAction::RotateCcw);
            session.snapshot_into(&mut snap);
        }

        // Hard drop drives lock, row clearing and spawning.
        for _ in 0..25 {
            let _ = session.apply_action(GameAction::HardDrop);
            let _ = session.tick(CLEAR_FLASH_MS);
            if session.game_over() {
                let _ = session.apply_action(GameAction::Restart);
            }
        }
    });

    assert_eq!(allocs, 0);
}

#[test]
fn render_into_reused_framebuffer_does_not_allocate() {
    let mut session = Session::new(&SessionConfig::default());
    session.reset();
    let view = GameView::default();
    let vp = Viewport::new(60, 24);
    let ranking = [1200, 300, 40];
    let mut fb = FrameBuffer::new(vp.width, vp.height);
    let mut snap = GameSnapshot::default();

    let allocs = with_alloc_counting(|| {
        for _ in 0..20 {
            let _ = session.apply_action(GameAction::SoftDrop);
            session.snapshot_into(&mut snap);
            view.render_into(&snap, &ranking, vp, &mut fb);
        }
    });

    assert_eq!(allocs, 0);
}
