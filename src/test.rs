//! Integration-level test helpers and scenarios that exercise a full
//! [`GameBoy`] instance rather than a single component in isolation.

use crate::gb::GameBoy;

#[derive(Default)]
pub struct TestOptions {
    pub ppu_enabled: Option<bool>,
    pub dma_enabled: Option<bool>,
    pub timer_enabled: Option<bool>,
}

/// Builds a [`GameBoy`] already loaded with a blank 32 KiB ROM-only
/// cartridge, ready to have a test program poked into its address space.
pub fn build_test(options: TestOptions) -> Box<GameBoy> {
    let mut game_boy = Box::new(GameBoy::new());
    game_boy.set_ppu_enabled(options.ppu_enabled.unwrap_or(true));
    game_boy.set_dma_enabled(options.dma_enabled.unwrap_or(true));
    game_boy.set_timer_enabled(options.timer_enabled.unwrap_or(true));
    game_boy.load_rom_empty().unwrap();
    game_boy
}

/// Builds a [`GameBoy`] whose cartridge is a blank 32 KiB ROM-only image
/// with `program` written starting at `0x0100`, the conventional entry
/// point for cartridge code.
pub fn build_program_test(program: &[u8], options: TestOptions) -> Box<GameBoy> {
    let mut data = vec![0u8; 32 * 1024];
    data[0x0100..0x0100 + program.len()].copy_from_slice(program);

    let mut game_boy = Box::new(GameBoy::new());
    game_boy.set_ppu_enabled(options.ppu_enabled.unwrap_or(true));
    game_boy.set_dma_enabled(options.dma_enabled.unwrap_or(true));
    game_boy.set_timer_enabled(options.timer_enabled.unwrap_or(true));
    game_boy.load_rom(&data, None).unwrap();
    game_boy
}

#[cfg(test)]
mod tests {
    use super::{build_program_test, build_test, TestOptions};
    use crate::consts::{IE_ADDR, IF_ADDR};

    #[test]
    fn test_add_updates_accumulator_and_clears_flags() {
        // LD A,0x42; LD B,0x07; ADD A,B
        let mut game_boy = build_program_test(&[0x3e, 0x42, 0x06, 0x07, 0x80], TestOptions::default());

        game_boy.clock();
        game_boy.clock();
        game_boy.clock();

        assert_eq!(game_boy.cpu_i().a, 0x49);
        assert!(!game_boy.cpu_i().zero());
        assert!(!game_boy.cpu_i().sub());
        assert!(!game_boy.cpu_i().half_carry());
        assert!(!game_boy.cpu_i().carry());
    }

    #[test]
    fn test_add_immediate_sets_carry_without_half_carry() {
        // LD A,0xF0; ADD A,0x20
        let mut game_boy = build_program_test(&[0x3e, 0xf0, 0xc6, 0x20], TestOptions::default());

        game_boy.clock();
        game_boy.clock();

        assert_eq!(game_boy.cpu_i().a, 0x10);
        assert!(!game_boy.cpu_i().zero());
        assert!(!game_boy.cpu_i().half_carry());
        assert!(game_boy.cpu_i().carry());
    }

    #[test]
    fn test_xor_self_zeroes_accumulator_and_sets_zero() {
        // XOR A,A
        let mut game_boy = build_program_test(&[0xaf], TestOptions::default());

        game_boy.clock();

        assert_eq!(game_boy.cpu_i().a, 0x00);
        assert!(game_boy.cpu_i().zero());
        assert!(!game_boy.cpu_i().sub());
        assert!(!game_boy.cpu_i().half_carry());
        assert!(!game_boy.cpu_i().carry());
    }

    #[test]
    fn test_ld_hl_increment_reads_and_advances_pointer() {
        // LD HL,0x1234; LD A,(HL+)
        let mut data = vec![0u8; 32 * 1024];
        data[0x0100] = 0x21;
        data[0x0101] = 0x34;
        data[0x0102] = 0x12;
        data[0x0103] = 0x2a;
        data[0x1234] = 0x77;

        let mut game_boy = Box::new(crate::gb::GameBoy::new());
        game_boy.load_rom(&data, None).unwrap();

        game_boy.clock();
        game_boy.clock();

        assert_eq!(game_boy.cpu_i().a, 0x77);
        assert_eq!(game_boy.cpu_i().hl(), 0x1235);
    }

    #[test]
    fn test_countdown_loop_terminates_with_zero_and_zero_flag() {
        // LD C,0x05; loop: DEC C; JR NZ,-3
        let mut game_boy =
            build_program_test(&[0x0e, 0x05, 0x0d, 0x20, 0xfd], TestOptions::default());

        game_boy.clock(); // LD C,0x05
        for _ in 0..5 {
            game_boy.clock(); // DEC C
            game_boy.clock(); // JR NZ,-3 (taken four times, not taken on the fifth)
        }

        assert_eq!(game_boy.cpu_i().c, 0x00);
        assert!(game_boy.cpu_i().zero());
    }

    #[test]
    fn test_sla_shifts_out_top_bit_into_carry() {
        // LD A,0x81; SLA A
        let mut game_boy = build_program_test(&[0x3e, 0x81, 0xcb, 0x27], TestOptions::default());

        game_boy.clock();
        game_boy.clock();

        assert_eq!(game_boy.cpu_i().a, 0x02);
        assert!(game_boy.cpu_i().carry());
        assert!(!game_boy.cpu_i().zero());
        assert!(!game_boy.cpu_i().sub());
        assert!(!game_boy.cpu_i().half_carry());
    }

    #[test]
    fn test_vblank_interrupt_dispatch_after_ei_delay() {
        // EI; NOP; NOP
        let mut game_boy = build_program_test(&[0xfb, 0x00, 0x00], TestOptions::default());

        game_boy.write_memory(IE_ADDR, 0x01);
        game_boy.write_memory(IF_ADDR, 0x01);

        game_boy.clock(); // executes EI, arms the one-instruction delay
        game_boy.clock(); // first NOP, IME still false
        game_boy.clock(); // IME flips true, interrupt is serviced immediately

        assert_eq!(game_boy.cpu_i().pc(), 0x0040);
        assert!(!game_boy.cpu_i().ime());
        assert_eq!(game_boy.read_memory(IF_ADDR) & 0x01, 0x00);
        assert_eq!(game_boy.cpu_i().sp(), 0xfffc);
    }

    #[test]
    fn test_halted_cpu_wakes_without_servicing_when_ime_disabled() {
        // HALT; NOP
        let mut game_boy = build_program_test(&[0x76, 0x00], TestOptions::default());

        game_boy.write_memory(IE_ADDR, 0x01);

        game_boy.clock(); // executes HALT, cpu.halted() becomes true
        assert!(game_boy.cpu_i().halted());

        game_boy.write_memory(IF_ADDR, 0x01);
        game_boy.clock(); // wakes up without servicing, since IME is disabled

        assert!(!game_boy.cpu_i().halted());
        assert_eq!(game_boy.cpu_i().pc(), 0x0102);
    }

    #[test]
    fn test_build_test_boots_into_post_boot_state() {
        let game_boy = build_test(TestOptions::default());

        assert_eq!(game_boy.cpu_i().pc(), 0x0100);
        assert_eq!(game_boy.cpu_i().sp(), 0xfffe);
    }
}
