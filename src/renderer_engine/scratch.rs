use super::indices::{
    checked_generate_indices, CapacityError, INDICES_PER_QUAD, VERTICES_PER_QUAD,
};
use super::quad::make_quad_from;
use super::types::{QuadDescriptor, Vertex};

/// Tableaux CPU réutilisés d'une frame à l'autre.
///
/// Dimensionnés une fois pour `max_quads` ; `fill` vide puis réécrit sans jamais
/// réallouer (aucune allocation par frame).
#[derive(Debug)]
pub struct FrameScratch {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    max_quads: usize,
}

impl FrameScratch {
    pub fn with_capacity(max_quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(max_quads.saturating_mul(VERTICES_PER_QUAD)),
            indices: Vec::with_capacity(max_quads.saturating_mul(INDICES_PER_QUAD)),
            max_quads,
        }
    }

    pub fn max_quads(&self) -> usize {
        self.max_quads
    }

    /// Resynthétise sommets et indices pour `quads`.
    ///
    /// Refuse (sans rien écrire) un nombre de quads supérieur à `max_quads`.
    pub fn fill(&mut self, quads: &[QuadDescriptor]) -> Result<(), CapacityError> {
        self.vertices.clear();
        if quads.len() > self.max_quads {
            self.indices.clear();
            return Err(CapacityError {
                requested: quads.len(),
                capacity: self.max_quads,
            });
        }

        checked_generate_indices(
            quads.len(),
            self.max_quads * INDICES_PER_QUAD,
            &mut self.indices,
        )?;
        self.vertices.extend(quads.iter().flat_map(make_quad_from));
        Ok(())
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{vec2, Vec4};

    fn quads(n: usize) -> Vec<QuadDescriptor> {
        (0..n)
            .map(|i| QuadDescriptor::new(vec2(i as f32 * 120.0, 0.0), 100.0, Vec4::ONE, i as u32 % 3))
            .collect()
    }

    #[test]
    fn test_fill_builds_contiguous_vertices_and_indices() {
        let mut scratch = FrameScratch::with_capacity(5);
        scratch.fill(&quads(2)).unwrap();

        assert_eq!(scratch.vertices().len(), 8);
        assert_eq!(scratch.indices(), &[0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
        assert_eq!(scratch.vertices()[4].position, [120.0, 0.0]);
        assert_eq!(scratch.quad_count(), 2);
    }

    #[test]
    fn test_fill_does_not_reallocate_between_frames() {
        let mut scratch = FrameScratch::with_capacity(5);
        scratch.fill(&quads(5)).unwrap();
        let vertex_ptr = scratch.vertices().as_ptr();
        let index_ptr = scratch.indices().as_ptr();

        for n in [0, 3, 5, 1] {
            scratch.fill(&quads(n)).unwrap();
            assert_eq!(scratch.vertices().as_ptr(), vertex_ptr);
            assert_eq!(scratch.indices().as_ptr(), index_ptr);
            assert_eq!(scratch.indices().len(), n * 6);
        }
    }

    #[test]
    fn test_fill_rejects_more_quads_than_capacity() {
        let mut scratch = FrameScratch::with_capacity(5);
        scratch.fill(&quads(2)).unwrap();

        let err = scratch.fill(&quads(6)).unwrap_err();
        assert_eq!(err.requested, 6);
        assert_eq!(err.capacity, 5);
        assert!(scratch.vertices().is_empty());
        assert!(scratch.indices().is_empty());
    }

    #[test]
    fn test_zero_capacity_accepts_empty_frame() {
        let mut scratch = FrameScratch::with_capacity(0);
        scratch.fill(&[]).unwrap();
        assert_eq!(scratch.quad_count(), 0);
    }
}
