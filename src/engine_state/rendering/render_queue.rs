//! Per-frame draw request queue.
//!
//! The queue is generic over the buffer handle so ordering can be checked without a GPU.
//! Opaque requests keep submission order. Alpha-blended requests are drawn farthest
//! first, measured from the camera position recorded by [`RenderQueue::begin`] to the
//! position given with each request.

use std::cmp::Ordering;

use cgmath::{MetricSpace, Point3};

/// Draw requests collected between `begin` and `end` of a frame.
#[derive(Debug)]
pub struct RenderQueue<B> {
    camera_position: Point3<f32>,
    opaque: Vec<B>,
    alpha_blended: Vec<(B, Point3<f32>)>,
}

impl<B> Default for RenderQueue<B> {
    fn default() -> Self {
        Self {
            camera_position: Point3::new(0.0, 0.0, 0.0),
            opaque: Vec::new(),
            alpha_blended: Vec::new(),
        }
    }
}

impl<B> RenderQueue<B> {
    /// Drops last frame's requests and records the camera position for sorting.
    pub fn begin(&mut self, camera_position: Point3<f32>) {
        self.camera_position = camera_position;
        self.opaque.clear();
        self.alpha_blended.clear();
    }

    /// Queues an opaque draw.
    pub fn push_opaque(&mut self, buffer: B) {
        self.opaque.push(buffer);
    }

    /// Queues an alpha-blended draw located at `position`.
    pub fn push_alpha_blended(&mut self, buffer: B, position: Point3<f32>) {
        self.alpha_blended.push((buffer, position));
    }

    /// Opaque requests in submission order.
    pub fn opaque(&self) -> &[B] {
        &self.opaque
    }

    /// Alpha-blended requests, farthest from the camera first.
    pub fn sorted_alpha_blended(&mut self) -> impl Iterator<Item = &B> {
        let camera = self.camera_position;
        self.alpha_blended.sort_by(|(_, a), (_, b)| {
            let distance_a = camera.distance2(*a);
            let distance_b = camera.distance2(*b);
            distance_b.partial_cmp(&distance_a).unwrap_or(Ordering::Equal)
        });
        self.alpha_blended.iter().map(|(buffer, _)| buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_blended_requests_come_back_farthest_first() {
        let mut queue = RenderQueue::default();
        queue.begin(Point3::new(0.0, 0.0, 0.0));
        queue.push_alpha_blended("near", Point3::new(1.0, 0.0, 0.0));
        queue.push_alpha_blended("far", Point3::new(0.0, 0.0, -30.0));
        queue.push_alpha_blended("middle", Point3::new(0.0, 10.0, 0.0));

        let order: Vec<_> = queue.sorted_alpha_blended().copied().collect();
        assert_eq!(order, vec!["far", "middle", "near"]);
    }

    #[test]
    fn begin_clears_the_previous_frame() {
        let mut queue = RenderQueue::default();
        queue.begin(Point3::new(0.0, 0.0, 0.0));
        queue.push_opaque(1);
        queue.push_alpha_blended(2, Point3::new(0.0, 0.0, 0.0));

        queue.begin(Point3::new(5.0, 0.0, 0.0));
        assert!(queue.opaque().is_empty());
        assert_eq!(queue.sorted_alpha_blended().count(), 0);
    }

    #[test]
    fn sorting_uses_the_latest_camera_position() {
        let mut queue = RenderQueue::default();
        queue.begin(Point3::new(10.0, 0.0, 0.0));
        queue.push_alpha_blended("west", Point3::new(-5.0, 0.0, 0.0));
        queue.push_alpha_blended("east", Point3::new(5.0, 0.0, 0.0));

        let order: Vec<_> = queue.sorted_alpha_blended().copied().collect();
        assert_eq!(order, vec!["west", "east"]);
    }

    #[test]
    fn opaque_requests_keep_submission_order() {
        let mut queue = RenderQueue::default();
        queue.begin(Point3::new(0.0, 0.0, 0.0));
        for i in 0..4 {
            queue.push_opaque(i);
        }
        assert_eq!(queue.opaque(), &[0, 1, 2, 3]);
    }
}
