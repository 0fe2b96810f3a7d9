use std::time::{Duration, Instant};

/// Delay between automatic slide advances.
pub const SLIDE_INTERVAL: Duration = Duration::from_millis(5000);
/// Length of the opacity crossfade after an advance.
pub const CROSSFADE_WINDOW: Duration = Duration::from_millis(1000);

/// Auto-advancing slide rotation with a crossfade between neighbours.
///
/// Time is injected by the caller, so the rotation advances only when
/// [`Carousel::frame`] observes a new instant. A paused or backgrounded host
/// simply catches up on the next observation instead of drifting.
pub struct Carousel<S> {
    slides: Vec<S>,
    index: usize,
    previous: Option<usize>,
    phase_started: Option<Instant>,
}

/// What to draw for one paint of the carousel.
///
/// `blend` is the opacity of `current` in `[0.0, 1.0]`; `previous` is painted
/// underneath while a crossfade is running and is `None` otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselFrame<'a, S> {
    pub current: &'a S,
    pub previous: Option<&'a S>,
    pub blend: f64,
}

impl<S> Carousel<S> {
    pub fn new(slides: Vec<S>) -> Self {
        Self {
            slides,
            index: 0,
            previous: None,
            phase_started: None,
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Advances the rotation up to `now` and reports what to draw.
    ///
    /// Returns `None` when there are no slides. A single slide is always
    /// fully opaque and never schedules an advance.
    pub fn frame(&mut self, now: Instant) -> Option<CarouselFrame<'_, S>> {
        if self.slides.is_empty() {
            return None;
        }
        if self.slides.len() == 1 {
            return Some(CarouselFrame {
                current: &self.slides[0],
                previous: None,
                blend: 1.0,
            });
        }

        let mut started = *self.phase_started.get_or_insert(now);
        while now.duration_since(started) >= SLIDE_INTERVAL {
            self.previous = Some(self.index);
            self.index = (self.index + 1) % self.slides.len();
            started += SLIDE_INTERVAL;
        }
        self.phase_started = Some(started);

        let elapsed = now.duration_since(started);
        let blend = match self.previous {
            Some(_) if elapsed < CROSSFADE_WINDOW => {
                elapsed.as_secs_f64() / CROSSFADE_WINDOW.as_secs_f64()
            }
            Some(_) => {
                self.previous = None;
                1.0
            }
            None => 1.0,
        };

        Some(CarouselFrame {
            current: &self.slides[self.index],
            previous: self.previous.map(|i| &self.slides[i]),
            blend,
        })
    }

    /// Next instant the host must repaint at, relative to the last `frame`
    /// observation: the end of a running crossfade, otherwise the next
    /// advance. `None` when fewer than two slides exist or no frame has been
    /// observed yet.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.slides.len() < 2 {
            return None;
        }
        let started = self.phase_started?;
        if self.previous.is_some() {
            Some(started + CROSSFADE_WINDOW)
        } else {
            Some(started + SLIDE_INTERVAL)
        }
    }
}

#[cfg(test)]
#[path = "tests/carousel_tests.rs"]
mod tests;
