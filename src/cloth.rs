use glam::Vec3;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ClothConfig {
    #[serde(default = "ClothConfig::default_rows")]
    pub rows: usize,
    #[serde(default = "ClothConfig::default_cols")]
    pub cols: usize,
    #[serde(default = "ClothConfig::default_spacing")]
    pub spacing: f32,
    #[serde(default = "ClothConfig::default_origin")]
    pub origin: [f32; 3],
    #[serde(default = "ClothConfig::default_node_half_extents")]
    pub node_half_extents: [f32; 3],
    #[serde(default = "ClothConfig::default_damping")]
    pub damping: f32,
    #[serde(default = "ClothConfig::default_density")]
    pub density: f32,
}

impl ClothConfig {
    const fn default_rows() -> usize {
        8
    }

    const fn default_cols() -> usize {
        8
    }

    const fn default_spacing() -> f32 {
        0.6
    }

    const fn default_origin() -> [f32; 3] {
        [0.0, 10.0, 0.0]
    }

    const fn default_node_half_extents() -> [f32; 3] {
        [0.2, 0.05, 0.2]
    }

    const fn default_damping() -> f32 {
        0.5
    }

    const fn default_density() -> f32 {
        0.5
    }
}

impl Default for ClothConfig {
    fn default() -> Self {
        Self {
            rows: Self::default_rows(),
            cols: Self::default_cols(),
            spacing: Self::default_spacing(),
            origin: Self::default_origin(),
            node_half_extents: Self::default_node_half_extents(),
            damping: Self::default_damping(),
            density: Self::default_density(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClothNodeSpec {
    pub row: usize,
    pub col: usize,
    pub position: Vec3,
    /// Top-row nodes never move.
    pub anchor: bool,
}

/// Spherical joint between two node indices, anchors in each node's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClothJointSpec {
    pub a: usize,
    pub b: usize,
    pub anchor_a: Vec3,
    pub anchor_b: Vec3,
}

#[derive(Debug, Clone)]
pub struct ClothLayout {
    rows: usize,
    cols: usize,
    nodes: Vec<ClothNodeSpec>,
    joints: Vec<ClothJointSpec>,
}

impl ClothLayout {
    pub fn new(config: &ClothConfig) -> Self {
        let (rows, cols, spacing) = (config.rows, config.cols, config.spacing);
        let origin = Vec3::from_array(config.origin);
        let half = spacing * 0.5;
        let mut nodes = Vec::with_capacity(rows * cols);
        let mut joints = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                let offset = Vec3::new((col as f32 - cols as f32 / 2.0) * spacing, -(row as f32) * spacing, 0.0);
                nodes.push(ClothNodeSpec { row, col, position: origin + offset, anchor: row == 0 });
                let index = row * cols + col;
                if col > 0 {
                    joints.push(ClothJointSpec {
                        a: index - 1,
                        b: index,
                        anchor_a: Vec3::new(half, 0.0, 0.0),
                        anchor_b: Vec3::new(-half, 0.0, 0.0),
                    });
                }
                if row > 0 {
                    joints.push(ClothJointSpec {
                        a: index - cols,
                        b: index,
                        anchor_a: Vec3::new(0.0, -half, 0.0),
                        anchor_b: Vec3::new(0.0, half, 0.0),
                    });
                }
            }
        }
        Self { rows, cols, nodes, joints }
    }

    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    pub fn nodes(&self) -> &[ClothNodeSpec] {
        &self.nodes
    }

    pub fn joints(&self) -> &[ClothJointSpec] {
        &self.joints
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}
