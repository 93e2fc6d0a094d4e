// Integration tests for the process manager: instruction semantics,
// scheduling transitions, and turnaround accounting

use procsim::commander::Command;
use procsim::manager::{Flow, ManagerError, Pid, ProcessManager, ProcessState};
use procsim::program::{Instruction, MemoryLoader};
use procsim::snapshot::{LineKind, Transcript};

fn boot(programs: &[(&str, &str)]) -> ProcessManager {
    let mut loader = MemoryLoader::new();
    for (name, text) in programs {
        loader.insert(name, text);
    }
    ProcessManager::boot(loader).expect("Boot failed")
}

fn run(manager: &mut ProcessManager, commands: &str, sink: &mut Transcript) {
    for ch in commands.chars() {
        manager.dispatch_char(ch, sink);
        assert_invariants(manager);
    }
}

fn assert_invariants(manager: &ProcessManager) {
    let consistency = manager
        .table()
        .check_consistency(manager.cpu().running());
    assert!(consistency.is_ok(), "{:?}", consistency);
    assert!(
        manager.cpu().running().is_some() || manager.table().ready().is_empty(),
        "CPU idle while processes are ready"
    );
}

#[test]
fn test_boot_installs_init_as_running() {
    let manager = boot(&[("init", "S 1\nE")]);

    assert_eq!(manager.cpu().running(), Some(Pid(0)));
    assert_eq!(manager.timestamp(), 0);

    let init = manager.table().get(Pid(0)).expect("init PCB missing");
    assert_eq!(init.parent, None);
    assert_eq!(init.priority, 0);
    assert_eq!(init.state, ProcessState::Running);
    assert_eq!(init.start_time, 0);
    assert_eq!(init.program.len(), 2);
}

#[test]
fn test_boot_fails_without_init() {
    let err = ProcessManager::boot(MemoryLoader::new())
        .err()
        .expect("Boot should fail");

    assert!(matches!(err, ManagerError::InitLoadFailed(_)));
    assert!(err.is_fatal());
}

#[test]
fn test_boot_fails_on_malformed_init() {
    let loader = MemoryLoader::new().with_program("init", "S 1\nZ 2");
    let err = ProcessManager::boot(loader).err().expect("Boot should fail");

    match err {
        ManagerError::InitLoadFailed(cause) => assert_eq!(cause.line(), Some(2)),
        other => panic!("Expected init load failure, got {:?}", other),
    }
}

#[test]
fn test_set_add_decrement() {
    let mut manager = boot(&[("init", "S 5\nA 3\nD 1\nE")]);
    let mut sink = Transcript::new();

    run(&mut manager, "QQQ", &mut sink);

    assert_eq!(manager.cpu().value, 7);
    assert_eq!(manager.cpu().program_counter, 3);
    assert_eq!(manager.timestamp(), 3);
    assert!(sink.of_kind(LineKind::Diagnostic).is_empty());
}

#[test]
fn test_time_used_counts_executed_instructions() {
    let mut manager = boot(&[("init", "S 5\nA 3\nE")]);
    let mut sink = Transcript::new();

    run(&mut manager, "QQ", &mut sink);

    assert_eq!(manager.table().get(Pid(0)).unwrap().time_used, 2);
}

#[test]
fn test_end_records_turnaround() {
    let mut manager = boot(&[("init", "S 1\nE")]);
    let mut sink = Transcript::new();

    run(&mut manager, "QQ", &mut sink);

    let accounting = manager.accounting();
    assert_eq!(accounting.terminated(), 1);
    // End ran at timestamp 1: 1 + 1 - 0
    assert_eq!(accounting.cumulative_turnaround(), 2);
    assert_eq!(manager.cpu().running(), None);

    let init = manager.table().get(Pid(0)).unwrap();
    assert_eq!(init.state, ProcessState::Terminated);
    assert_eq!(init.value, 1);
}

#[test]
fn test_implicit_end_past_last_instruction() {
    let mut manager = boot(&[("init", "S 3")]);
    let mut sink = Transcript::new();

    run(&mut manager, "QQ", &mut sink);

    assert!(sink.contains("without E"));
    assert_eq!(manager.accounting().terminated(), 1);
    assert_eq!(
        manager.table().get(Pid(0)).unwrap().state,
        ProcessState::Terminated
    );
}

#[test]
fn test_quantum_on_idle_cpu_still_ticks() {
    let mut manager = boot(&[("init", "E")]);
    let mut sink = Transcript::new();

    run(&mut manager, "QQQ", &mut sink);

    assert_eq!(manager.timestamp(), 3);
    assert_eq!(
        sink.of_kind(LineKind::Diagnostic),
        vec!["No processes are running", "No processes are running"]
    );
}

#[test]
fn test_fork_creates_child_and_skips_parent() {
    let mut manager = boot(&[("init", "S 1\nF 2\nS 2\nE\nS 3\nE")]);
    let mut sink = Transcript::new();

    run(&mut manager, "QQ", &mut sink);

    // Fetch left the counter at 2; the fork offset moves it on to `S 3`
    assert_eq!(manager.cpu().program_counter, 4);
    assert_eq!(manager.cpu().running(), Some(Pid(0)));

    let child = manager.table().get(Pid(1)).expect("child PCB missing");
    assert_eq!(child.parent, Some(Pid(0)));
    assert_eq!(child.program_counter, 2);
    assert_eq!(child.value, 1);
    assert_eq!(child.priority, 0);
    assert_eq!(child.state, ProcessState::Ready);
    assert_eq!(child.start_time, 1);
    assert_eq!(child.time_used, 0);
    assert_eq!(child.program, manager.table().get(Pid(0)).unwrap().program);
    assert_eq!(manager.table().ready().iter().copied().collect::<Vec<_>>(), vec![Pid(1)]);
}

#[test]
fn test_fork_program_runs_both_paths() {
    let mut manager = boot(&[("init", "S 1\nF 2\nS 2\nE\nS 3\nE")]);
    let mut sink = Transcript::new();

    run(&mut manager, "QQQQ", &mut sink);

    // Parent ran S 3 then E; the child takes over
    let parent = manager.table().get(Pid(0)).unwrap();
    assert_eq!(parent.state, ProcessState::Terminated);
    assert_eq!(parent.value, 3);
    assert_eq!(manager.cpu().running(), Some(Pid(1)));

    run(&mut manager, "QQ", &mut sink);

    let child = manager.table().get(Pid(1)).unwrap();
    assert_eq!(child.state, ProcessState::Terminated);
    assert_eq!(child.value, 2);

    // Turnarounds: parent 3 + 1 - 0 = 4, child 5 + 1 - 1 = 5
    let accounting = manager.accounting();
    assert_eq!(accounting.terminated(), 2);
    assert_eq!(accounting.cumulative_turnaround(), 9);
    assert_eq!(accounting.average_turnaround(), Some(4));
}

#[test]
fn test_fork_rejects_out_of_range_offsets() {
    for (text, offset) in [("F 2\nE", 2), ("F -1\nE", -1), ("F 9\nE", 9)] {
        let mut manager = boot(&[("init", text)]);
        let mut sink = Transcript::new();

        run(&mut manager, "Q", &mut sink);

        let expected = ManagerError::InvalidForkOffset {
            offset,
            program_len: 2,
        }
        .to_string();
        assert_eq!(sink.of_kind(LineKind::Diagnostic), vec![expected.as_str()]);
        assert_eq!(manager.table().len(), 1, "no child for offset {}", offset);
        assert_eq!(manager.cpu().program_counter, 1);
        assert!(manager.table().ready().is_empty());
    }
}

#[test]
fn test_fork_with_last_valid_offset() {
    let mut manager = boot(&[("init", "F 1\nE")]);
    let mut sink = Transcript::new();

    run(&mut manager, "Q", &mut sink);

    assert_eq!(manager.table().len(), 2);
    assert_eq!(manager.cpu().program_counter, 2);

    // Parent skipped its own E and ends implicitly
    run(&mut manager, "Q", &mut sink);
    assert!(sink.contains("without E"));
    assert_eq!(manager.cpu().running(), Some(Pid(1)));
}

#[test]
fn test_fork_reports_full_table() {
    let loader = MemoryLoader::new().with_program("init", "F 0\nF 0\nE");
    let mut manager = ProcessManager::boot_with(loader, "init", 2).expect("Boot failed");
    let mut sink = Transcript::new();

    run(&mut manager, "QQ", &mut sink);

    assert_eq!(
        sink.of_kind(LineKind::Diagnostic),
        vec!["No free PCBs available (capacity 2)"]
    );
    assert_eq!(manager.table().len(), 2);
    assert_eq!(manager.table().ready().len(), 1);
    assert_eq!(manager.cpu().program_counter, 2);
}

#[test]
fn test_slots_are_never_reused() {
    let loader = MemoryLoader::new().with_program("init", "F 0\nE");
    let mut manager = ProcessManager::boot_with(loader, "init", 2).expect("Boot failed");
    let mut sink = Transcript::new();

    // Parent forks, ends; child (same program, counter after F) ends too
    run(&mut manager, "QQQ", &mut sink);
    assert_eq!(manager.accounting().terminated(), 2);

    assert_eq!(manager.table().next_free(), None);
}

#[test]
fn test_block_and_unblock() {
    let mut manager = boot(&[("init", "S 4\nB\nA 5\nE")]);
    let mut sink = Transcript::new();

    run(&mut manager, "QQ", &mut sink);

    assert_eq!(manager.cpu().running(), None);
    let init = manager.table().get(Pid(0)).unwrap();
    assert_eq!(init.state, ProcessState::Blocked);
    assert_eq!(init.program_counter, 2);
    assert_eq!(init.value, 4);
    assert_eq!(manager.table().blocked().front(), Some(&Pid(0)));

    run(&mut manager, "U", &mut sink);

    assert_eq!(manager.cpu().running(), Some(Pid(0)));
    assert_eq!(manager.cpu().program_counter, 2);
    assert_eq!(manager.cpu().value, 4);
    assert!(manager.table().blocked().is_empty());

    run(&mut manager, "Q", &mut sink);
    assert_eq!(manager.cpu().value, 9);
}

#[test]
fn test_unblock_with_empty_queue_is_noop() {
    let mut manager = boot(&[("init", "S 1\nE")]);
    let mut sink = Transcript::new();

    run(&mut manager, "U", &mut sink);

    assert_eq!(manager.cpu().running(), Some(Pid(0)));
    assert_eq!(manager.timestamp(), 0);
    assert!(sink.of_kind(LineKind::Diagnostic).is_empty());
}

#[test]
fn test_unblocked_process_waits_behind_running() {
    // Parent forks a child that blocks immediately
    let mut manager = boot(&[("init", "F 1\nB\nS 7\nS 8\nE")]);
    let mut sink = Transcript::new();

    // Parent: F (pc -> 2), S 7; child still ready
    run(&mut manager, "QQ", &mut sink);
    assert_eq!(manager.cpu().value, 7);

    // Parent: S 8, E; child dispatched at pc 1 and blocks
    run(&mut manager, "QQQ", &mut sink);
    assert_eq!(manager.cpu().running(), None);
    assert_eq!(manager.table().blocked().front(), Some(&Pid(1)));

    run(&mut manager, "U", &mut sink);
    assert_eq!(manager.cpu().running(), Some(Pid(1)));
    assert_eq!(manager.cpu().program_counter, 2);
}

#[test]
fn test_ready_queue_is_fifo_not_priority() {
    let mut manager = boot(&[("init", "F 0\nF 0\nE")]);
    let mut sink = Transcript::new();

    run(&mut manager, "QQQ", &mut sink);

    // Children 1 and 2 were forked in that order; 1 runs first
    assert_eq!(manager.cpu().running(), Some(Pid(1)));
    assert_eq!(manager.table().ready().front(), Some(&Pid(2)));
}

#[test]
fn test_replace_loads_new_program() {
    let mut manager = boot(&[("init", "S 4\nR other\nA 1\nE"), ("other", "A 10\nE")]);
    let mut sink = Transcript::new();

    run(&mut manager, "QQ", &mut sink);

    assert_eq!(manager.cpu().program_counter, 0);
    assert_eq!(
        manager.running_program(),
        Some(&[Instruction::Add(10), Instruction::End][..])
    );

    run(&mut manager, "Q", &mut sink);
    assert_eq!(manager.cpu().value, 14);

    run(&mut manager, "Q", &mut sink);
    assert_eq!(manager.accounting().terminated(), 1);
}

#[test]
fn test_fork_bounds_use_replaced_program() {
    // F 3 is out of range for init (2 instructions) but valid for big (4)
    let mut manager = boot(&[("init", "R big\nE"), ("big", "F 3\nS 1\nS 2\nE")]);
    let mut sink = Transcript::new();

    run(&mut manager, "QQ", &mut sink);

    assert!(sink.of_kind(LineKind::Diagnostic).is_empty());
    assert_eq!(manager.table().len(), 2);
    assert_eq!(manager.cpu().running(), Some(Pid(0)));
    assert_eq!(manager.cpu().program_counter, 4);

    let child = manager.table().get(Pid(1)).unwrap();
    assert_eq!(child.program.len(), 4);
    assert_eq!(child.program_counter, 1);
    assert_eq!(manager.table().ready().front(), Some(&Pid(1)));
}

#[test]
fn test_replace_failure_leaves_empty_program() {
    let mut manager = boot(&[("init", "R missing\nS 1\nE")]);
    let mut sink = Transcript::new();

    run(&mut manager, "Q", &mut sink);

    let diagnostics = sink.of_kind(LineKind::Diagnostic);
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].starts_with("Failed to load program from file missing"));
    assert_eq!(manager.running_program(), Some(&[][..]));
    assert_eq!(manager.cpu().program_counter, 1);

    // Empty program: the next quantum ends the process
    run(&mut manager, "Q", &mut sink);
    assert_eq!(manager.accounting().terminated(), 1);
    assert_eq!(manager.table().get(Pid(0)).unwrap().value, 0);
}

#[test]
fn test_invalid_command_is_ignored() {
    let mut manager = boot(&[("init", "S 1\nE")]);
    let mut sink = Transcript::new();

    let flow = manager.dispatch_char('X', &mut sink);

    assert_eq!(flow, Flow::Continue);
    assert_eq!(
        sink.of_kind(LineKind::Diagnostic),
        vec!["Invalid command character 'X'"]
    );
    assert_eq!(manager.timestamp(), 0);
}

#[test]
fn test_terminate_stops_dispatch() {
    let mut manager = boot(&[("init", "S 1\nE")]);
    let mut sink = Transcript::new();

    assert_eq!(manager.dispatch(Command::Terminate, &mut sink), Flow::Exit);
    assert!(manager.is_terminated());

    assert_eq!(manager.dispatch(Command::Quantum, &mut sink), Flow::Exit);
    assert_eq!(manager.timestamp(), 0);
}

#[test]
fn test_block_unblock_sequences_keep_queues_consistent() {
    // Every Q/U sequence of length 8 over a program that forks and blocks
    for mask in 0u32..256 {
        let mut manager = boot(&[("init", "F 0\nB\nA 1\nB\nF 1\nE\nE")]);
        let mut sink = Transcript::new();

        let commands: String = (0..8)
            .map(|bit| if mask & (1 << bit) != 0 { 'Q' } else { 'U' })
            .collect();
        run(&mut manager, &commands, &mut sink);

        for pcb in manager.table().iter() {
            let places = [
                manager.table().ready().contains(&pcb.pid),
                manager.table().blocked().contains(&pcb.pid),
                manager.cpu().running() == Some(pcb.pid),
            ]
            .iter()
            .filter(|&&present| present)
            .count();

            match pcb.state {
                ProcessState::Terminated => assert_eq!(places, 0, "{}", commands),
                _ => assert_eq!(places, 1, "{}", commands),
            }
        }
    }
}
