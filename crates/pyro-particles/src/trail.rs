//! Per-particle position history used to draw trails

use crate::particle::ParticleBuffer;
use pyro_core::Vec3;

/// Bounded ring of past positions for one particle
#[derive(Debug, Clone, Default)]
struct Track {
    samples: Vec<Vec3>,
    current_index: usize,
}

impl Track {
    fn push(&mut self, position: Vec3, limit: usize) {
        if self.samples.len() < limit {
            self.samples.push(position);
        } else {
            self.samples[self.current_index] = position;
        }
        self.current_index = (self.current_index + 1) % limit;
    }

    /// `age` 0 is the newest sample
    fn get(&self, age: usize) -> Option<Vec3> {
        let len = self.samples.len();
        if age >= len {
            return None;
        }
        let newest = (self.current_index + len - 1) % len;
        Some(self.samples[(newest + len - age) % len])
    }
}

/// Ring-buffered history of every particle's recent positions.
///
/// Each particle keeps at most `history_limit` samples; once full, the
/// oldest sample is overwritten. Owned by one emitter.
#[derive(Debug, Clone)]
pub struct TrailHistory {
    tracks: Vec<Track>,
    history_limit: usize,
    origin: Vec3,
}

impl TrailHistory {
    /// A `history_limit` of zero is raised to one
    pub fn new(particle_count: usize, history_limit: usize, origin: Vec3) -> Self {
        Self {
            tracks: vec![Track::default(); particle_count],
            history_limit: history_limit.max(1),
            origin,
        }
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn particle_count(&self) -> usize {
        self.tracks.len()
    }

    /// Append a position to one particle's ring; out-of-range indices are ignored
    pub fn record(&mut self, particle: usize, position: Vec3) {
        let limit = self.history_limit;
        if let Some(track) = self.tracks.get_mut(particle) {
            track.push(position, limit);
        }
    }

    /// Record the current position of every particle in `buffer`
    pub fn record_all(&mut self, buffer: &ParticleBuffer) {
        for i in 0..buffer.len().min(self.tracks.len()) {
            self.record(i, buffer.position(i));
        }
    }

    /// Samples held for one particle
    pub fn len(&self, particle: usize) -> usize {
        self.tracks.get(particle).map_or(0, |t| t.samples.len())
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.iter().all(|t| t.samples.is_empty())
    }

    /// The position `age` frames back (0 = newest), if that deep a history exists
    pub fn sample(&self, particle: usize, age: usize) -> Option<Vec3> {
        self.tracks.get(particle).and_then(|t| t.get(age))
    }

    /// Like [`TrailHistory::sample`], but clamps to the oldest recorded
    /// sample; falls back to the emitter origin when nothing is recorded.
    pub fn sample_clamped(&self, particle: usize, age: usize) -> Vec3 {
        let Some(track) = self.tracks.get(particle) else {
            return self.origin;
        };
        match track.samples.len() {
            0 => self.origin,
            len => track.get(age.min(len - 1)).unwrap_or(self.origin),
        }
    }

    /// Flat positions ordered particle-major, oldest to newest within a
    /// particle. Always `particle_count * history_limit` points: slots not
    /// yet recorded sit at the emitter origin.
    pub fn materialize(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.tracks.len() * self.history_limit * 3);
        for track in &self.tracks {
            for age in (0..self.history_limit).rev() {
                let p = track.get(age).unwrap_or(self.origin);
                out.extend_from_slice(&p.to_array());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: f32) -> Vec3 {
        Vec3::new(0.0, y, 0.0)
    }

    #[test]
    fn history_never_exceeds_limit() {
        let mut trail = TrailHistory::new(3, 10, Vec3::ZERO);
        for n in 0..1000 {
            trail.record(1, at(n as f32));
        }
        assert_eq!(trail.len(1), 10);
        assert_eq!(trail.len(0), 0);
    }

    #[test]
    fn oldest_sample_is_overwritten() {
        let mut trail = TrailHistory::new(1, 3, Vec3::ZERO);
        for y in 0..5 {
            trail.record(0, at(y as f32));
        }
        assert_eq!(trail.sample(0, 0), Some(at(4.0)));
        assert_eq!(trail.sample(0, 2), Some(at(2.0)));
        assert_eq!(trail.sample(0, 3), None);
    }

    #[test]
    fn materialize_orders_oldest_to_newest() {
        let mut trail = TrailHistory::new(2, 3, Vec3::ZERO);
        for y in 0..4 {
            trail.record(0, at(y as f32));
        }
        trail.record(1, at(10.0));

        let flat = trail.materialize();
        let ys: Vec<f32> = flat.chunks(3).map(|c| c[1]).collect();
        assert_eq!(ys, vec![1.0, 2.0, 3.0, 0.0, 0.0, 10.0]);
    }

    #[test]
    fn materialize_pads_cold_start_with_origin() {
        let origin = Vec3::new(0.0, -1.0, 0.0);
        let mut trail = TrailHistory::new(1, 5, origin);
        assert_eq!(trail.materialize().len(), 5 * 3);

        trail.record(0, at(1.0));
        trail.record(0, at(2.0));
        let ys: Vec<f32> = trail.materialize().chunks(3).map(|c| c[1]).collect();
        assert_eq!(ys, vec![-1.0, -1.0, -1.0, 1.0, 2.0]);
    }

    #[test]
    fn clamped_sample_uses_oldest_or_origin() {
        let origin = Vec3::new(5.0, 0.0, 5.0);
        let mut trail = TrailHistory::new(2, 4, origin);
        assert_eq!(trail.sample_clamped(0, 2), origin);
        assert_eq!(trail.sample_clamped(99, 0), origin);

        trail.record(0, at(1.0));
        trail.record(0, at(2.0));
        assert_eq!(trail.sample_clamped(0, 10), at(1.0));
        assert_eq!(trail.sample_clamped(0, 0), at(2.0));
    }

    #[test]
    fn out_of_range_record_is_ignored() {
        let mut trail = TrailHistory::new(1, 4, Vec3::ZERO);
        trail.record(5, at(1.0));
        assert!(trail.is_empty());
    }

    #[test]
    fn zero_limit_is_raised() {
        let mut trail = TrailHistory::new(1, 0, Vec3::ZERO);
        trail.record(0, at(1.0));
        trail.record(0, at(2.0));
        assert_eq!(trail.history_limit(), 1);
        assert_eq!(trail.sample(0, 0), Some(at(2.0)));
    }
}
