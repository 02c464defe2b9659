use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

cfg_if::cfg_if! {
    if #[cfg(target_family = "wasm")] {
        use web_time::Instant;
    } else {
        use std::time::Instant;
    }
}

#[derive(Debug, Default, Clone)]
struct InnerTimer {
    start: Option<Instant>,
    elapsed: Duration,
    subtimers: SubTimersMap,
}

impl InnerTimer {
    fn reset(&mut self) {
        self.start = None;
        self.elapsed = Duration::ZERO;
        self.subtimers.clear();
    }

    fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    fn stop(&mut self) {
        if let Some(instant) = self.start.take() {
            self.elapsed += instant.elapsed();
        }
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

#[derive(Debug, Default, Clone)]
struct SubTimersMap(HashMap<&'static str, InnerTimer>);

impl Deref for SubTimersMap {
    type Target = HashMap<&'static str, InnerTimer>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for SubTimersMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl SubTimersMap {
    fn reset_subtimer(&mut self, key: &'static str) {
        let t = self.entry(key).or_default();
        t.reset();
    }

    fn start_subtimer(&mut self, key: &'static str) {
        let t = self.0.entry(key).or_default();
        t.start();
    }

    fn total_time(&self) -> Duration {
        self.values()
            .fold(Duration::ZERO, |acc, t| acc + t.elapsed())
    }

    fn log(&self, depth: u8) {
        for (key, val) in self.iter() {
            let tabs = format!("{: <1$}", "", 4 * depth as usize);
            log::debug!("{}{:} : {:?}", tabs, *key, val.elapsed);
            val.subtimers.log(depth + 1);
        }
    }
}

/// A stack of named timers.  Starting a timer while another is
/// running makes the new one a child of the running one.
#[derive(Default, Debug, Clone)]
pub struct Timers {
    stack: Vec<&'static str>,
    subtimers: SubTimersMap,
}

impl Timers {
    fn mut_active_timer(&mut self) -> Option<&mut InnerTimer> {
        let (first, rest) = self.stack.split_first()?;

        //first one gets special treatment since self is not
        //an InnerTimer and a common trait would be overkill
        let mut active_timer = self.subtimers.get_mut(first)?;

        for key in rest {
            active_timer = active_timer.subtimers.get_mut(key)?;
        }
        Some(active_timer)
    }

    pub fn reset_timer(&mut self, key: &'static str) {
        self.subtimers.reset_subtimer(key);
    }

    pub fn start_as_current(&mut self, key: &'static str) {
        //starts a timer with name "key" as the current timer

        let active_timer = self.mut_active_timer();

        if let Some(active) = active_timer {
            // child of current active timer
            active.subtimers.start_subtimer(key);
        } else {
            // nothing active, create one at root
            self.subtimers.start_subtimer(key);
        }

        //append to timer call stack
        self.stack.push(key);
    }

    pub fn stop_current(&mut self) {
        //stops the current timer, if there is one
        if let Some(active) = self.mut_active_timer() {
            active.stop();
        }

        //remove from timer call stack
        self.stack.pop();
    }

    pub fn total_time(&self) -> Duration {
        self.subtimers.total_time()
    }

    /// Elapsed time of the root level timer `key`, or zero if it has
    /// never been started
    pub fn elapsed(&self, key: &'static str) -> Duration {
        self.subtimers
            .get(key)
            .map_or(Duration::ZERO, InnerTimer::elapsed)
    }

    /// Elapsed time of the root level timer `key` in milliseconds
    pub fn elapsed_ms(&self, key: &'static str) -> f64 {
        self.elapsed(key).as_secs_f64() * 1e3
    }

    /// Write the timer tree to the log at `debug` level
    pub fn log(&self) {
        self.subtimers.log(0);
    }
}

macro_rules! timeit {
    ($timer:ident => $key:literal; $($tt:tt)+) => {

        $timer.start_as_current($key);
        $(
            $tt
        )+
        $timer.stop_current();
    }
}
pub(crate) use timeit;

#[test]
fn test_timers_nesting() {
    let mut timers = Timers::default();

    timeit! {timers => "setup"; {
        timeit! {timers => "factor"; {
            std::thread::sleep(Duration::from_millis(2));
        }}
    }}

    assert!(timers.elapsed("setup") >= Duration::from_millis(2));
    assert_eq!(timers.elapsed("factor"), Duration::ZERO); //not a root timer
    assert!(timers.elapsed_ms("setup") >= 2.0);
    assert_eq!(timers.elapsed_ms("solve"), 0.0);

    timers.reset_timer("setup");
    assert_eq!(timers.total_time(), Duration::ZERO);
}
