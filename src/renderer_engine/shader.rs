use anyhow::{anyhow, Context, Result};
use glam::Mat4;
use log::{info, warn};
use regex::Regex;
use std::{collections::HashMap, fs, path::Path};

use super::device::Device;
use crate::gl_call;

lazy_static::lazy_static! {
    // 0:12(105): ...   (Standard/Intel/Mesa)
    static ref RE_STANDARD: Regex = Regex::new(r"(\d+):(\d+)\((\d+)\)").unwrap();
    // 0(12) : error ... (NVIDIA)
    static ref RE_NVIDIA: Regex = Regex::new(r"(\d+)\((\d+)\)\s*:").unwrap();
    // ERROR: 0:12: ... (AMD/ATI)
    static ref RE_AMD: Regex = Regex::new(r":\s*(\d+):(\d+):").unwrap();
}

/// Sources d'un programme, découpées depuis un fichier `.shader` unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderProgramSource {
    pub vertex: String,
    pub fragment: String,
}

/// Découpe un fichier combiné en sections vertex / fragment.
///
/// Une ligne contenant `#shader vertex` (ou `#shader fragment`) change de section ;
/// les lignes précédant le premier marqueur sont ignorées.
pub fn parse_shader(source: &str) -> ShaderProgramSource {
    #[derive(Clone, Copy)]
    enum Section {
        None,
        Vertex,
        Fragment,
    }

    let mut section = Section::None;
    let mut parsed = ShaderProgramSource::default();

    for line in source.lines() {
        if line.contains("#shader") {
            if line.contains("vertex") {
                section = Section::Vertex;
            } else if line.contains("fragment") {
                section = Section::Fragment;
            }
            continue;
        }
        let out = match section {
            Section::None => continue,
            Section::Vertex => &mut parsed.vertex,
            Section::Fragment => &mut parsed.fragment,
        };
        out.push_str(line);
        out.push('\n');
    }
    parsed
}

/// Lit et découpe un fichier `.shader`.
pub fn load_shader_file<P: AsRef<Path>>(path: P) -> Result<ShaderProgramSource> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to load shader file '{}'", path.display()))?;
    let parsed = parse_shader(&text);
    if parsed.vertex.trim().is_empty() || parsed.fragment.trim().is_empty() {
        return Err(anyhow!(
            "Shader file '{}' must contain both '#shader vertex' and '#shader fragment' sections",
            path.display()
        ));
    }
    Ok(parsed)
}

/// Programme GPU lié, avec cache des locations d'uniforms.
#[derive(Debug)]
pub struct Shader {
    id: u32,
    label: String,
    uniform_cache: HashMap<String, i32>,
}

impl Shader {
    pub fn from_source<D: Device + ?Sized>(
        device: &mut D,
        label: &str,
        source: &ShaderProgramSource,
    ) -> Result<Self> {
        let id = gl_call!(device, device.create_program(&source.vertex, &source.fragment))
            .map_err(|e| anyhow!("Shader '{}': {}", label, e))?;
        info!("✅ Shader '{}' compiled (program #{})", label, id);
        Ok(Self {
            id,
            label: label.to_string(),
            uniform_cache: HashMap::new(),
        })
    }

    pub fn from_file<D: Device + ?Sized, P: AsRef<Path>>(device: &mut D, path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = load_shader_file(path)?;
        Self::from_source(device, &path.display().to_string(), &source)
    }

    pub fn bind<D: Device + ?Sized>(&self, device: &mut D) {
        gl_call!(device, device.use_program(self.id));
    }

    pub fn unbind<D: Device + ?Sized>(&self, device: &mut D) {
        gl_call!(device, device.use_program(0));
    }

    /// Location d'un uniform, interrogée une seule fois puis mise en cache.
    pub fn uniform_location<D: Device + ?Sized>(&mut self, device: &mut D, name: &str) -> i32 {
        if let Some(&location) = self.uniform_cache.get(name) {
            return location;
        }
        let location = gl_call!(device, device.uniform_location(self.id, name));
        if location == -1 {
            warn!("Shader '{}': uniform '{}' doesn't exist", self.label, name);
        }
        self.uniform_cache.insert(name.to_string(), location);
        location
    }

    // Les setters supposent le programme lié (`bind`).

    pub fn set_uniform_1i<D: Device + ?Sized>(&mut self, device: &mut D, name: &str, value: i32) {
        let location = self.uniform_location(device, name);
        gl_call!(device, device.uniform_1i(location, value));
    }

    pub fn set_uniform_1iv<D: Device + ?Sized>(&mut self, device: &mut D, name: &str, values: &[i32]) {
        let location = self.uniform_location(device, name);
        gl_call!(device, device.uniform_1iv(location, values));
    }

    pub fn set_uniform_4f<D: Device + ?Sized>(&mut self, device: &mut D, name: &str, value: [f32; 4]) {
        let location = self.uniform_location(device, name);
        gl_call!(device, device.uniform_4f(location, value));
    }

    pub fn set_uniform_mat4<D: Device + ?Sized>(&mut self, device: &mut D, name: &str, matrix: &Mat4) {
        let location = self.uniform_location(device, name);
        gl_call!(device, device.uniform_mat4(location, &matrix.to_cols_array()));
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn destroy<D: Device + ?Sized>(self, device: &mut D) {
        gl_call!(device, device.delete_program(self.id));
    }
}

/// Message d'erreur de compilation enrichi de l'extrait GLSL fautif.
pub(crate) fn describe_compile_error(stage: &str, src: &str, log: &str) -> String {
    let mut message = format!("Failed to compile {} shader:\n{}", stage, log);
    match parse_glsl_error_line(log) {
        Some(line) => message.push_str(&format_glsl_error_context(src, line)),
        None => message.push_str(&format!(
            "\n(Debug: Failed to parse line number. Raw log: {:?})",
            log
        )),
    }
    message
}

/// Numéro de ligne d'une erreur GLSL, selon le format du driver.
fn parse_glsl_error_line(log: &str) -> Option<usize> {
    [&*RE_STANDARD, &*RE_NVIDIA, &*RE_AMD]
        .iter()
        .find_map(|re| re.captures(log)?.get(2)?.as_str().parse::<usize>().ok())
}

/// Extrait du code GLSL autour de la ligne fautive (±2 lignes).
fn format_glsl_error_context(src: &str, line_number: usize) -> String {
    const CONTEXT_RANGE: usize = 2;

    let lines: Vec<&str> = src.lines().collect();
    if lines.is_empty() || line_number == 0 {
        return String::new();
    }

    let start = line_number
        .saturating_sub(1 + CONTEXT_RANGE)
        .min(lines.len());
    let end = (line_number + CONTEXT_RANGE).min(lines.len());

    let mut output = format!("\n🔍 Error context (line {}):\n", line_number);
    for (i, line) in lines[start..end].iter().enumerate() {
        let current = start + i + 1;
        if current == line_number {
            output.push_str(&format!("> {:>3} | {}\n", current, line));
            output.push_str(&format!("        {}\n", "^".repeat(line.len().min(80))));
        } else {
            output.push_str(&format!("  {:>3} | {}\n", current, line));
        }
    }
    output
}
