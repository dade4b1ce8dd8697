/// Represents a timer inside of the chip
/// infrastruture, it will count down to
/// zero from what ever number given.
///
/// The timer doesn't keep track of time on its own, the host
/// calls [`tick`](Timer::tick) at the rate it wishes to emulate
/// (normaly [`HERTZ`](crate::definitions::timer::HERTZ)).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    /// will store the value of the timer
    value: u8,
}

impl Timer {
    /// Will create a new timer with the given value.
    pub fn new(value: u8) -> Self {
        Self { value }
    }

    /// Will set the value from which the timer shall count down from.
    pub fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    /// Will get the value that the counter is currently at.
    pub fn get_value(&self) -> u8 {
        self.value
    }

    /// Will count the timer down by one, a timer at zero stays at zero.
    pub fn tick(&mut self) {
        self.value = self.value.saturating_sub(1);
    }

    /// Checks if the timer is still counting down.
    pub fn is_active(&self) -> bool {
        self.value > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::timer;

    #[test]
    fn test_timer() {
        let mut timer = Timer::new(timer::DEFAULT);
        assert!(timer.is_active());

        for _ in 0..timer::HERTZ {
            timer.tick();
        }
        assert_eq!(timer.get_value(), 0);
        assert!(!timer.is_active());
    }

    #[test]
    fn test_timer_floor() {
        let mut timer = Timer::new(0);
        timer.tick();
        assert_eq!(timer.get_value(), 0);

        timer.set_value(1);
        timer.tick();
        timer.tick();
        assert_eq!(timer.get_value(), 0);
    }
}
