use std::f32::consts::TAU;

use cgmath::{Matrix4, Rad, SquareMatrix, Vector3};
use slotmap::{new_key_type, SlotMap};
use wgpu::Device;

use super::{
    model::ModelData,
    object::Mesh,
    room::{Room, RoomDimensions, RoomPart, FLOOR_LEVEL},
};
use crate::gfx::{geometry::generate_box, picking::Ray};

new_key_type! {
    /// Handle to a node in the scene graph
    pub struct NodeId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Floor,
    Wall,
    /// Root of a loaded model; the unit that gets placed, selected and deleted
    Placeable,
    /// Sub-mesh of a placeable model
    Part,
}

pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub position: Vector3<f32>,
    pub yaw: Rad<f32>,
    mesh: Option<Mesh>,
}

impl SceneNode {
    fn new(name: impl Into<String>, kind: NodeKind, mesh: Option<Mesh>) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            children: Vec::new(),
            position: Vector3::new(0.0, 0.0, 0.0),
            yaw: Rad(0.0),
            mesh,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    /// `T(position) * R_y(yaw)`
    pub fn local_transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * Matrix4::from_angle_y(self.yaw)
    }
}

/// A ray hit against a mesh-bearing node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub node: NodeId,
    pub distance: f32,
    pub point: Vector3<f32>,
}

/// Scene graph of the room and the furniture placed in it.
///
/// Owns the hit-test registry: the ordered node ids pointer rays are cast
/// against while something is being placed. The floor is a member from
/// construction; placeable roots join when settled and leave when picked up
/// again or deleted.
pub struct Scene {
    nodes: SlotMap<NodeId, SceneNode>,
    roots: Vec<NodeId>,
    room: Room,
    floor: NodeId,
    hit_targets: Vec<NodeId>,
}

impl Scene {
    pub fn new(dimensions: RoomDimensions) -> Self {
        let room = Room::new(dimensions);
        let mut nodes = SlotMap::with_key();
        let mut roots = Vec::new();
        let mut floor = None;

        for volume in room.volumes() {
            let mesh = Mesh::from_geometry(&generate_box(volume.size), volume.color);
            let kind = match volume.part {
                RoomPart::Floor => NodeKind::Floor,
                RoomPart::BackWall | RoomPart::LeftWall => NodeKind::Wall,
            };
            let mut node = SceneNode::new(volume.name, kind, Some(mesh));
            node.position = volume.center;

            let id = nodes.insert(node);
            roots.push(id);
            if kind == NodeKind::Floor {
                floor = Some(id);
            }
        }

        // volumes() always yields the floor first
        let floor = floor.unwrap_or_else(|| roots[0]);

        log::debug!(
            "Room built: {}x{}x{}",
            dimensions.width,
            dimensions.depth,
            dimensions.height
        );

        Self {
            nodes,
            roots,
            room,
            floor,
            hit_targets: vec![floor],
        }
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn floor(&self) -> NodeId {
        self.floor
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Adds a model as a placeable root at the floor origin with one child
    /// per sub-mesh. The new object is not hit-testable until registered.
    pub fn insert_model(&mut self, model: ModelData) -> NodeId {
        let mut root = SceneNode::new(model.name, NodeKind::Placeable, None);
        root.position = Vector3::new(0.0, FLOOR_LEVEL, 0.0);
        let root_id = self.nodes.insert(root);

        for part in model.parts {
            let mut node = SceneNode::new(part.name.clone(), NodeKind::Part, Some(part.into_mesh()));
            node.parent = Some(root_id);
            let id = self.nodes.insert(node);
            if let Some(root) = self.nodes.get_mut(root_id) {
                root.children.push(id);
            }
        }

        self.roots.push(root_id);
        root_id
    }

    /// Nearest placeable ancestor of `id`, including `id` itself
    pub fn owner_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(node_id)?;
            if node.kind == NodeKind::Placeable {
                return Some(node_id);
            }
            current = node.parent;
        }
        None
    }

    /// Adds a node to the hit-test registry. Returns false if it was already
    /// a member or does not exist.
    pub fn register(&mut self, id: NodeId) -> bool {
        if !self.contains(id) || self.is_registered(id) {
            return false;
        }
        self.hit_targets.push(id);
        true
    }

    pub fn unregister(&mut self, id: NodeId) -> bool {
        let before = self.hit_targets.len();
        self.hit_targets.retain(|&target| target != id);
        self.hit_targets.len() != before
    }

    pub fn is_registered(&self, id: NodeId) -> bool {
        self.hit_targets.contains(&id)
    }

    pub fn hit_targets(&self) -> &[NodeId] {
        &self.hit_targets
    }

    /// Registered placeable objects, in registration order
    pub fn settled_objects(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.hit_targets.iter().copied().filter(move |&id| {
            self.nodes
                .get(id)
                .is_some_and(|node| node.kind == NodeKind::Placeable)
        })
    }

    pub fn position(&self, id: NodeId) -> Option<Vector3<f32>> {
        self.nodes.get(id).map(|node| node.position)
    }

    pub fn set_position(&mut self, id: NodeId, position: Vector3<f32>) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    pub fn yaw(&self, id: NodeId) -> Option<Rad<f32>> {
        self.nodes.get(id).map(|node| node.yaw)
    }

    /// Adds `delta` to the node's yaw, wrapped into `[0, 2π)`
    pub fn rotate_yaw(&mut self, id: NodeId, delta: Rad<f32>) -> Option<Rad<f32>> {
        let node = self.nodes.get_mut(id)?;
        let yaw = (node.yaw.0 + delta.0).rem_euclid(TAU);
        // rem_euclid can round up to TAU for tiny negative inputs
        node.yaw = Rad(if yaw >= TAU { 0.0 } else { yaw });
        Some(node.yaw)
    }

    /// Product of local transforms from the root down to `id`
    pub fn world_transform(&self, id: NodeId) -> Matrix4<f32> {
        let mut transform = Matrix4::identity();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|node_id| self.nodes.get(node_id)) {
            transform = node.local_transform() * transform;
            current = node.parent;
        }
        transform
    }

    /// Casts against the subtrees of the hit-test registry
    pub fn raycast_registry(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits = Vec::new();
        for &target in &self.hit_targets {
            self.collect_hits(target, ray, &mut hits);
        }
        sort_hits(&mut hits);
        hits
    }

    /// Casts against every mesh in the scene graph
    pub fn raycast_all(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits = Vec::new();
        for &root in &self.roots {
            self.collect_hits(root, ray, &mut hits);
        }
        sort_hits(&mut hits);
        hits
    }

    fn collect_hits(&self, start: NodeId, ray: &Ray, hits: &mut Vec<RayHit>) {
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };

            if let Some(mesh) = &node.mesh {
                if let Some(inverse) = self.world_transform(id).invert() {
                    let local_ray = ray.transform(&inverse);
                    if let Some(t) = mesh.intersect_ray(&local_ray) {
                        hits.push(RayHit {
                            node: id,
                            distance: t,
                            point: ray.point_at(t),
                        });
                    }
                }
            }

            // Reversed so children pop in declaration order
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Removes a placeable root and all of its descendants, destroying their
    /// GPU buffers. Returns the number of meshes dropped, or `None` if `root`
    /// is not a placeable object.
    pub fn remove_object(&mut self, root: NodeId) -> Option<usize> {
        if self.nodes.get(root)?.kind != NodeKind::Placeable {
            return None;
        }

        self.unregister(root);
        self.roots.retain(|&id| id != root);

        let mut released = 0;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.remove(id) else {
                continue;
            };
            stack.extend(node.children);
            if let Some(mesh) = node.mesh {
                mesh.release();
                released += 1;
            }
        }

        Some(released)
    }

    /// Meshes with their current world transforms
    pub fn meshes(&self) -> impl Iterator<Item = (&Mesh, Matrix4<f32>)> + '_ {
        self.nodes.iter().filter_map(move |(id, node)| {
            node.mesh
                .as_ref()
                .map(|mesh| (mesh, self.world_transform(id)))
        })
    }

    /// Uploads any mesh that has no GPU buffers yet
    pub fn init_gpu_resources(&mut self, device: &Device, object_layout: &wgpu::BindGroupLayout) {
        for node in self.nodes.values_mut() {
            if let Some(mesh) = node.mesh.as_mut().filter(|mesh| !mesh.has_gpu_resources()) {
                mesh.init_gpu_resources(device, object_layout);
            }
        }
    }

    /// Writes every mesh's world transform to its uniform buffer
    pub fn update_gpu_transforms(&self, queue: &wgpu::Queue) {
        for (mesh, transform) in self.meshes() {
            mesh.update_uniform(queue, transform);
        }
    }
}

fn sort_hits(hits: &mut [RayHit]) {
    // sort_by is stable: equal distances keep traversal order
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}
