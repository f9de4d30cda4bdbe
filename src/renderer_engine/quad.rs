use glam::Vec4;

use super::types::{QuadDescriptor, Vertex};

/// Coordonnées de texture, dans l'ordre des sommets d'un quad.
pub const QUAD_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Produit les 4 sommets d'un quad carré ancré en `(x, y)`.
///
/// Ordre fixe (anti-horaire) : bas-gauche, bas-droite, haut-droite, haut-gauche.
/// Le générateur d'indices suppose que le sommet `i` du quad `k` est à `4k + i`.
///
/// `edge == 0` donne 4 sommets confondus, `edge < 0` un quad miroir : les deux
/// sont acceptés tels quels.
pub fn make_quad(x: f32, y: f32, edge: f32, color: Vec4, texture_slot: u32) -> [Vertex; 4] {
    let corners = [[x, y], [x + edge, y], [x + edge, y + edge], [x, y + edge]];
    let color = color.to_array();
    let tex_index = texture_slot as f32;

    let mut quad = [Vertex::default(); 4];
    for (vertex, (position, tex_coords)) in quad
        .iter_mut()
        .zip(corners.into_iter().zip(QUAD_TEX_COORDS))
    {
        *vertex = Vertex {
            position,
            color,
            tex_coords,
            tex_index,
        };
    }
    quad
}

/// Variante prenant un descripteur.
pub fn make_quad_from(desc: &QuadDescriptor) -> [Vertex; 4] {
    make_quad(
        desc.position.x,
        desc.position.y,
        desc.edge,
        desc.color,
        desc.texture_slot,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{vec2, vec4};

    const PURPLE: Vec4 = Vec4::new(0.55, 0.12, 0.67, 1.0);

    fn positions(quad: &[Vertex; 4]) -> Vec<[f32; 2]> {
        quad.iter().map(|v| v.position).collect()
    }

    #[test]
    fn test_unit_quad_at_origin() {
        let quad = make_quad(0.0, 0.0, 100.0, PURPLE, 0);
        assert_eq!(
            positions(&quad),
            vec![[0.0, 0.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0]]
        );
    }

    #[test]
    fn test_tex_coords_follow_vertex_order() {
        let quad = make_quad(-50.0, -50.0, 100.0, PURPLE, 1);
        let uvs: Vec<[f32; 2]> = quad.iter().map(|v| v.tex_coords).collect();
        assert_eq!(uvs, QUAD_TEX_COORDS.to_vec());
    }

    #[test]
    fn test_color_and_slot_are_shared_by_all_vertices() {
        let color = vec4(0.18, 0.95, 0.55, 1.0);
        let quad = make_quad(10.0, 20.0, 5.0, color, 3);
        for v in &quad {
            assert_eq!(v.color, [0.18, 0.95, 0.55, 1.0]);
            assert_eq!(v.tex_index, 3.0);
        }
    }

    #[test]
    fn test_square_side_equals_edge_magnitude() {
        for &(x, y, edge) in &[(0.0, 0.0, 100.0), (70.0, -50.0, 42.5), (3.0, 4.0, -10.0)] {
            let q = make_quad(x, y, edge, PURPLE, 0);
            assert_eq!(q[0].position, [x, y]);
            let side = |a: [f32; 2], b: [f32; 2]| ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
            for i in 0..4 {
                let d = side(q[i].position, q[(i + 1) % 4].position);
                assert!((d - edge.abs()).abs() < 1e-4, "side {} = {}", i, d);
            }
        }
    }

    #[test]
    fn test_zero_edge_is_degenerate_but_valid() {
        let quad = make_quad(12.0, 7.0, 0.0, PURPLE, 0);
        assert!(quad.iter().all(|v| v.position == [12.0, 7.0]));
    }

    #[test]
    fn test_negative_edge_mirrors_quad() {
        let quad = make_quad(0.0, 0.0, -10.0, PURPLE, 0);
        assert_eq!(
            positions(&quad),
            vec![[0.0, 0.0], [-10.0, 0.0], [-10.0, -10.0], [0.0, -10.0]]
        );
    }

    #[test]
    fn test_make_quad_from_descriptor() {
        let desc = QuadDescriptor::new(vec2(70.0, 0.0), 100.0, PURPLE, 1);
        assert_eq!(make_quad_from(&desc), make_quad(70.0, 0.0, 100.0, PURPLE, 1));
    }
}
