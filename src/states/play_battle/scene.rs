//! Battle scene sync
//!
//! Cubes for the two combatants and one small cube per live projectile,
//! positioned from the session's `FrameSnapshot` every frame. The scene
//! never writes back into the session.

use std::collections::HashMap;

use bevy::prelude::*;

use super::BattleEntity;
use crate::combat::projectiles::ProjectileId;
use crate::combat::{BattleSession, Side};

#[derive(Component)]
pub struct PlayerAvatar;

#[derive(Component)]
pub struct BossAvatar;

/// Handles shared by every projectile cube, plus the cube spawned for each
/// live projectile
#[derive(Resource)]
pub struct ProjectileVisuals {
    mesh: Handle<Mesh>,
    player_material: Handle<StandardMaterial>,
    boss_material: Handle<StandardMaterial>,
    spawned: HashMap<ProjectileId, Entity>,
}

pub fn spawn_battle_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    session: Res<BattleSession>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 14.0, 20.0).looking_at(Vec3::new(0.0, 0.0, -2.0), Vec3::Y),
        BattleEntity,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 15000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        BattleEntity,
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(16.0, 28.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.2, 0.25, 0.3),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_xyz(0.0, 0.0, -2.0),
        BattleEntity,
    ));

    let snapshot = session.snapshot();

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(1.0, 1.0, 1.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.6, 1.0))),
        Transform::from_translation(snapshot.player),
        PlayerAvatar,
        BattleEntity,
    ));

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(2.0, 2.0, 2.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.8, 0.2, 0.2))),
        Transform::from_translation(snapshot.boss),
        BossAvatar,
        BattleEntity,
    ));

    commands.insert_resource(ProjectileVisuals {
        mesh: meshes.add(Cuboid::new(0.3, 0.3, 0.6)),
        player_material: materials.add(Color::srgb(0.6, 0.9, 1.0)),
        boss_material: materials.add(Color::srgb(1.0, 0.5, 0.1)),
        spawned: HashMap::new(),
    });
}

pub fn sync_battle_scene(
    mut commands: Commands,
    session: Res<BattleSession>,
    visuals: Option<ResMut<ProjectileVisuals>>,
    mut player: Query<&mut Transform, (With<PlayerAvatar>, Without<BossAvatar>)>,
    mut boss: Query<&mut Transform, (With<BossAvatar>, Without<PlayerAvatar>)>,
    mut projectile_transforms: Query<&mut Transform, (Without<PlayerAvatar>, Without<BossAvatar>)>,
) {
    let Some(mut visuals) = visuals else {
        return;
    };
    let snapshot = session.snapshot();

    if let Ok(mut transform) = player.get_single_mut() {
        transform.translation = snapshot.player;
    }
    if let Ok(mut transform) = boss.get_single_mut() {
        transform.translation = snapshot.boss;
    }

    let visuals = &mut *visuals;
    visuals.spawned.retain(|id, entity| {
        let live = snapshot.projectiles.iter().any(|(live_id, _, _)| live_id == id);
        if !live {
            commands.entity(*entity).despawn_recursive();
        }
        live
    });

    for (id, owner, position) in &snapshot.projectiles {
        match visuals.spawned.get(id) {
            Some(entity) => {
                if let Ok(mut transform) = projectile_transforms.get_mut(*entity) {
                    transform.translation = *position;
                }
            }
            None => {
                let material = match owner {
                    Side::Player => visuals.player_material.clone(),
                    Side::Boss => visuals.boss_material.clone(),
                };
                let entity = commands
                    .spawn((
                        Mesh3d(visuals.mesh.clone()),
                        MeshMaterial3d(material),
                        Transform::from_translation(*position),
                        BattleEntity,
                    ))
                    .id();
                visuals.spawned.insert(*id, entity);
            }
        }
    }
}

/// Cleanup system: despawns all battle entities when leaving the battle
pub fn despawn_battle_scene(mut commands: Commands, query: Query<Entity, With<BattleEntity>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<ProjectileVisuals>();
}
