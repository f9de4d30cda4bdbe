use super::device::{AttribPointer, AttribType};

/// Type Rust utilisable comme composante d'attribut de sommet.
pub trait LayoutType {
    const ATTRIB: AttribType;
    /// Les octets sont normalisés vers [0, 1] côté GPU (couleurs RGBA8).
    const NORMALIZED: bool;
}

impl LayoutType for f32 {
    const ATTRIB: AttribType = AttribType::F32;
    const NORMALIZED: bool = false;
}

impl LayoutType for u32 {
    const ATTRIB: AttribType = AttribType::U32;
    const NORMALIZED: bool = false;
}

impl LayoutType for u8 {
    const ATTRIB: AttribType = AttribType::U8;
    const NORMALIZED: bool = true;
}

/// Un attribut : type, nombre de composantes (1 à 4), normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBufferElement {
    pub ty: AttribType,
    pub count: u32,
    pub normalized: bool,
}

impl VertexBufferElement {
    pub fn size_in_bytes(&self) -> u32 {
        self.count * self.ty.size_in_bytes()
    }
}

/// Descripteur de layout d'un vertex buffer.
///
/// Liste ordonnée d'attributs : l'attribut `i` est lu à la location `i` du shader,
/// à l'offset `offsets()[i]`, avec un pas de `stride()` octets entre deux sommets.
///
/// ⚠️ Pré-requis : la séquence de `push` doit reproduire exactement l'ordre et la
/// taille des champs de la struct de sommet envoyée au GPU. Aucune vérification à
/// l'exécution ici ; voir les tests de `Vertex::layout()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexBufferLayout {
    elements: Vec<VertexBufferElement>,
    stride: u32,
}

impl VertexBufferLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute un attribut de `count` composantes de type `T`.
    pub fn push<T: LayoutType>(&mut self, count: u32) -> &mut Self {
        debug_assert!(
            (1..=4).contains(&count),
            "vertex attribute component count must be in 1..=4, got {}",
            count
        );
        let element = VertexBufferElement {
            ty: T::ATTRIB,
            count,
            normalized: T::NORMALIZED,
        };
        self.stride += element.size_in_bytes();
        self.elements.push(element);
        self
    }

    pub fn elements(&self) -> &[VertexBufferElement] {
        &self.elements
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Offsets en octets : somme préfixe des tailles des attributs précédents.
    pub fn offsets(&self) -> Vec<u32> {
        self.elements
            .iter()
            .scan(0u32, |offset, element| {
                let current = *offset;
                *offset += element.size_in_bytes();
                Some(current)
            })
            .collect()
    }

    /// Les `glVertexAttribPointer` à émettre, dans l'ordre des locations.
    pub fn attrib_pointers(&self) -> Vec<AttribPointer> {
        self.elements
            .iter()
            .zip(self.offsets())
            .enumerate()
            .map(|(index, (element, offset))| AttribPointer {
                index: index as u32,
                count: element.count,
                ty: element.ty,
                normalized: element.normalized,
                stride: self.stride,
                offset,
            })
            .collect()
    }
}
