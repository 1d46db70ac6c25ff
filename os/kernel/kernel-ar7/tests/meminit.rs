use kernel_ar7::meminit::{Ar7MemoryBringup, MemoryBringup, memory_init_with};
use kernel_ar7::memory::{PAGE_SIZE, RAM_BASE};
use kernel_bootmem::{BootMemoryMap, RegionKind};
use kernel_memprobe::sim::SimulatedRam;

#[test]
fn registers_probed_ram_with_the_boot_map() {
    let mut ram = SimulatedRam::new(RAM_BASE, 16 << 20);
    let mut map = BootMemoryMap::new();

    let bytes = memory_init_with(&mut ram, RAM_BASE + (1 << 20), &mut map);

    assert_eq!(bytes, 16 << 20);
    assert_eq!(map.len(), 1);
    let region = map.regions()[0];
    assert_eq!(region.base, RAM_BASE);
    assert_eq!(region.size, 16 << 20);
    assert_eq!(region.kind, RegionKind::Ram);
}

#[test]
fn registered_size_is_page_aligned() {
    let mut ram = SimulatedRam::new(RAM_BASE, 8 << 20);
    let mut map = BootMemoryMap::new();

    let bytes = memory_init_with(&mut ram, RAM_BASE + (1 << 20), &mut map);
    assert_eq!(bytes % PAGE_SIZE, 0);
}

#[test]
fn probe_leaves_the_kernel_image_untouched() {
    let kernel_end = RAM_BASE + (2 << 20);
    let mut ram = SimulatedRam::new(RAM_BASE, 32 << 20);
    let mut map = BootMemoryMap::new();

    memory_init_with(&mut ram, kernel_end, &mut map);

    let lowest = ram.lowest_write().expect("probe wrote sentinels");
    assert!(lowest > kernel_end);
}

#[test]
fn bringup_registers_ram_and_frees_nothing() {
    let ram = SimulatedRam::new(RAM_BASE, 32 << 20);
    let mut bringup = Ar7MemoryBringup::new(ram, RAM_BASE + (2 << 20));
    let mut map = BootMemoryMap::new();

    bringup.init(&mut map);
    assert_eq!(map.total_bytes(RegionKind::Ram), 32 << 20);

    // The late hook is a deliberate no-op on this platform; the map must
    // stay exactly as registered.
    bringup.free_bootstrap_memory();
    assert_eq!(map.len(), 1);
}
