use bytemuck::Pod;
use log::debug;
use std::fmt;
use std::mem;

use super::device::{BufferTarget, BufferUsage, Device};
use crate::gl_call;
use crate::utils::HumanBytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// `offset + len` dépasse la taille allouée du buffer.
    OutOfRange {
        offset: usize,
        len: usize,
        capacity: usize,
    },
    /// Les données initiales sont plus grandes que l'allocation demandée.
    InitialDataTooLarge { len: usize, capacity: usize },
    /// `count * element_size` ne tient pas dans un `usize`.
    SizeOverflow { count: usize, element_size: usize },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::OutOfRange {
                offset,
                len,
                capacity,
            } => write!(
                f,
                "buffer update out of range: offset {} + {} bytes > capacity {} bytes",
                offset, len, capacity
            ),
            BufferError::InitialDataTooLarge { len, capacity } => write!(
                f,
                "initial data ({} bytes) larger than buffer ({} bytes)",
                len, capacity
            ),
            BufferError::SizeOverflow {
                count,
                element_size,
            } => write!(
                f,
                "buffer size overflow: {} elements of {} bytes",
                count, element_size
            ),
        }
    }
}

impl std::error::Error for BufferError {}

/// Taille en octets de `count` éléments, sans débordement.
fn byte_size(count: usize, element_size: usize) -> Result<usize, BufferError> {
    count
        .checked_mul(element_size)
        .ok_or(BufferError::SizeOverflow {
            count,
            element_size,
        })
}

/// Bloc de mémoire GPU de taille fixe.
///
/// Créé une fois, réécrit partiellement par `update_sub_range`, libéré par `destroy`.
/// Pas de `Drop` : la libération a besoin du device, qui est passé explicitement.
#[derive(Debug)]
pub struct GpuBuffer {
    id: u32,
    target: BufferTarget,
    size_in_bytes: usize,
    usage: BufferUsage,
}

impl GpuBuffer {
    /// Alloue exactement `size_in_bytes` octets, éventuellement initialisés par `data`.
    pub fn create<D: Device + ?Sized>(
        device: &mut D,
        target: BufferTarget,
        data: Option<&[u8]>,
        size_in_bytes: usize,
        dynamic: bool,
    ) -> Result<Self, BufferError> {
        if let Some(seed) = data {
            if seed.len() > size_in_bytes {
                return Err(BufferError::InitialDataTooLarge {
                    len: seed.len(),
                    capacity: size_in_bytes,
                });
            }
        }
        let usage = if dynamic {
            BufferUsage::Dynamic
        } else {
            BufferUsage::Static
        };

        let id = gl_call!(device, device.create_buffer());
        gl_call!(device, device.bind_buffer(target, id));
        gl_call!(device, device.buffer_data(target, size_in_bytes, data, usage));

        debug!(
            "GPU buffer #{} ({:?}, {:?}) allocated: {}",
            id,
            target,
            usage,
            size_in_bytes.human_bytes()
        );

        Ok(Self {
            id,
            target,
            size_in_bytes,
            usage,
        })
    }

    pub fn bind<D: Device + ?Sized>(&self, device: &mut D) {
        gl_call!(device, device.bind_buffer(self.target, self.id));
    }

    pub fn unbind<D: Device + ?Sized>(&self, device: &mut D) {
        gl_call!(device, device.bind_buffer(self.target, 0));
    }

    /// Réécrit `[offset, offset + bytes.len())` sans réallouer.
    ///
    /// La plage est validée avant tout appel au device : un dépassement est
    /// refusé et le buffer n'est pas touché.
    pub fn update_sub_range<D: Device + ?Sized>(
        &self,
        device: &mut D,
        offset: usize,
        bytes: &[u8],
    ) -> Result<(), BufferError> {
        let in_range = offset
            .checked_add(bytes.len())
            .is_some_and(|end| end <= self.size_in_bytes);
        if !in_range {
            return Err(BufferError::OutOfRange {
                offset,
                len: bytes.len(),
                capacity: self.size_in_bytes,
            });
        }
        if bytes.is_empty() {
            return Ok(());
        }

        self.bind(device);
        gl_call!(device, device.buffer_sub_data(self.target, offset, bytes));
        Ok(())
    }

    pub fn destroy<D: Device + ?Sized>(self, device: &mut D) {
        gl_call!(device, device.delete_buffer(self.id));
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }

    pub fn is_dynamic(&self) -> bool {
        self.usage == BufferUsage::Dynamic
    }
}

/// Vertex buffer typé par sa struct de sommet `V`.
#[derive(Debug)]
pub struct VertexBuffer {
    buffer: GpuBuffer,
    vertex_size: usize,
}

impl VertexBuffer {
    /// Buffer dynamique non initialisé, dimensionné pour `max_vertices` sommets `V`.
    pub fn dynamic<V: Pod, D: Device + ?Sized>(
        device: &mut D,
        max_vertices: usize,
    ) -> Result<Self, BufferError> {
        let vertex_size = mem::size_of::<V>();
        let size_in_bytes = byte_size(max_vertices, vertex_size)?;
        let buffer = GpuBuffer::create(device, BufferTarget::Vertex, None, size_in_bytes, true)?;
        Ok(Self {
            buffer,
            vertex_size,
        })
    }

    /// Buffer statique initialisé avec `vertices`.
    pub fn from_vertices<V: Pod, D: Device + ?Sized>(
        device: &mut D,
        vertices: &[V],
    ) -> Result<Self, BufferError> {
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let buffer = GpuBuffer::create(device, BufferTarget::Vertex, Some(bytes), bytes.len(), false)?;
        Ok(Self {
            buffer,
            vertex_size: mem::size_of::<V>(),
        })
    }

    /// Réécrit les sommets à partir de l'offset 0.
    pub fn update<V: Pod, D: Device + ?Sized>(
        &self,
        device: &mut D,
        vertices: &[V],
    ) -> Result<(), BufferError> {
        debug_assert_eq!(mem::size_of::<V>(), self.vertex_size);
        self.buffer
            .update_sub_range(device, 0, bytemuck::cast_slice(vertices))
    }

    /// Capacité en nombre de sommets.
    pub fn capacity(&self) -> usize {
        if self.vertex_size == 0 {
            return 0;
        }
        self.buffer.size_in_bytes() / self.vertex_size
    }

    pub fn bind<D: Device + ?Sized>(&self, device: &mut D) {
        self.buffer.bind(device);
    }

    pub fn unbind<D: Device + ?Sized>(&self, device: &mut D) {
        self.buffer.unbind(device);
    }

    pub fn buffer(&self) -> &GpuBuffer {
        &self.buffer
    }

    pub fn destroy<D: Device + ?Sized>(self, device: &mut D) {
        self.buffer.destroy(device);
    }
}

/// Index buffer `u32` avec un nombre d'indices actifs variable.
#[derive(Debug)]
pub struct IndexBuffer {
    buffer: GpuBuffer,
    capacity: usize,
    count: usize,
}

impl IndexBuffer {
    /// Buffer dynamique non initialisé pouvant contenir `capacity` indices.
    pub fn dynamic<D: Device + ?Sized>(device: &mut D, capacity: usize) -> Result<Self, BufferError> {
        let size_in_bytes = byte_size(capacity, mem::size_of::<u32>())?;
        let buffer = GpuBuffer::create(device, BufferTarget::Index, None, size_in_bytes, true)?;
        Ok(Self {
            buffer,
            capacity,
            count: 0,
        })
    }

    /// Buffer statique contenant exactement `indices`.
    pub fn from_indices<D: Device + ?Sized>(
        device: &mut D,
        indices: &[u32],
    ) -> Result<Self, BufferError> {
        let bytes: &[u8] = bytemuck::cast_slice(indices);
        let buffer = GpuBuffer::create(device, BufferTarget::Index, Some(bytes), bytes.len(), false)?;
        Ok(Self {
            buffer,
            capacity: indices.len(),
            count: indices.len(),
        })
    }

    /// Réécrit les indices à partir de l'offset 0 ; `count()` devient `indices.len()`.
    pub fn update<D: Device + ?Sized>(
        &mut self,
        device: &mut D,
        indices: &[u32],
    ) -> Result<(), BufferError> {
        self.buffer
            .update_sub_range(device, 0, bytemuck::cast_slice(indices))?;
        self.count = indices.len();
        Ok(())
    }

    /// Nombre d'indices actifs (dernière écriture).
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn bind<D: Device + ?Sized>(&self, device: &mut D) {
        self.buffer.bind(device);
    }

    pub fn unbind<D: Device + ?Sized>(&self, device: &mut D) {
        self.buffer.unbind(device);
    }

    pub fn buffer(&self) -> &GpuBuffer {
        &self.buffer
    }

    pub fn destroy<D: Device + ?Sized>(self, device: &mut D) {
        self.buffer.destroy(device);
    }
}
