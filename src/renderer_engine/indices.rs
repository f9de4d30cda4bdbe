use std::fmt;

pub const VERTICES_PER_QUAD: usize = 4;
pub const INDICES_PER_QUAD: usize = 6;

/// Nombre maximal de quads adressables par des indices `u32` (dernier sommet `4n - 1 <= u32::MAX`).
pub const MAX_INDEXABLE_QUADS: usize = 1 << 30;

/// Deux triangles (0,1,2) et (2,3,0) partageant la diagonale 0–2.
const QUAD_PATTERN: [u32; INDICES_PER_QUAD] = [0, 1, 2, 2, 3, 0];

/// La demande dépasse la capacité d'un buffer pré-alloué.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    /// Nombre d'éléments (quads, sommets ou indices) demandés.
    pub requested: usize,
    /// Nombre maximal d'éléments représentables.
    pub capacity: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "capacity exceeded: requested {} elements, capacity is {}",
            self.requested, self.capacity
        )
    }
}

impl std::error::Error for CapacityError {}

/// Les 6 indices du quad `k` : `4k, 4k+1, 4k+2, 4k+2, 4k+3, 4k`.
///
/// `k` doit rester < `MAX_INDEXABLE_QUADS`.
pub fn quad_indices(k: u32) -> [u32; INDICES_PER_QUAD] {
    let base = k * VERTICES_PER_QUAD as u32;
    QUAD_PATTERN.map(|i| base + i)
}

/// Ajoute à `out` les indices de `quad_count` quads rangés à partir du sommet 0.
///
/// Toujours une régénération complète : les quads sont contigus depuis 0, la
/// suppression au milieu n'existe pas.
pub fn extend_quad_indices(out: &mut Vec<u32>, quad_count: usize) {
    out.extend((0..quad_count as u32).flat_map(quad_indices));
}

/// Indices pour `quad_count` quads (longueur `6 * quad_count`).
pub fn generate_indices(quad_count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(quad_count * INDICES_PER_QUAD);
    extend_quad_indices(&mut indices, quad_count);
    indices
}

/// Comme [`generate_indices`], mais écrit dans `out` (vidé au préalable) et
/// refuse toute demande dont le nombre d'indices dépasse `index_capacity`.
///
/// En cas de refus, `out` est laissé vide.
pub fn checked_generate_indices(
    quad_count: usize,
    index_capacity: usize,
    out: &mut Vec<u32>,
) -> Result<(), CapacityError> {
    out.clear();
    quad_count
        .checked_mul(INDICES_PER_QUAD)
        .filter(|&n| n <= index_capacity && quad_count <= MAX_INDEXABLE_QUADS)
        .ok_or(CapacityError {
            requested: quad_count.saturating_mul(INDICES_PER_QUAD),
            capacity: index_capacity,
        })?;
    extend_quad_indices(out, quad_count);
    Ok(())
}

/// Capacités (sommets, indices) d'un batch de `max_quads` quads.
///
/// Refuse une capacité dont les indices ne tiennent pas en `u32` ou dont le
/// calcul déborde `usize`.
pub fn batch_capacity(max_quads: usize) -> Result<(usize, usize), CapacityError> {
    let too_large = CapacityError {
        requested: max_quads,
        capacity: MAX_INDEXABLE_QUADS,
    };
    if max_quads > MAX_INDEXABLE_QUADS {
        return Err(too_large);
    }
    let vertices = max_quads
        .checked_mul(VERTICES_PER_QUAD)
        .ok_or(too_large)?;
    let indices = max_quads.checked_mul(INDICES_PER_QUAD).ok_or(too_large)?;
    Ok((vertices, indices))
}
